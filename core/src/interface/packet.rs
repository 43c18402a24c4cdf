use crate::interface::measurement::{GeoPoint, Position};
use crate::prelude::{LocaliserError, LocaliserResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comma-separated text packets exchanged over the ground/vehicle radio link.
///
/// ```text
/// WIND,<unix_ts>,<direction_deg>,<speed_mps>          ground -> vehicle
/// UAV,<unix_ts>,<lat>,<lon>,<alt_m>,<co2_ppm>          vehicle -> ground
/// INIT,<unix_ts>,<ground_lat>,<ground_lon>             ground -> vehicle, once
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Packet {
    Wind {
        timestamp: f64,
        direction_deg: f64,
        speed_mps: f64,
    },
    Uav {
        timestamp: f64,
        position: Position,
        co2_ppm: f64,
    },
    Init {
        timestamp: f64,
        ground_station: GeoPoint,
    },
}

impl Packet {
    pub fn kind(&self) -> &'static str {
        match self {
            Packet::Wind { .. } => "WIND",
            Packet::Uav { .. } => "UAV",
            Packet::Init { .. } => "INIT",
        }
    }

    pub fn timestamp(&self) -> f64 {
        match *self {
            Packet::Wind { timestamp, .. }
            | Packet::Uav { timestamp, .. }
            | Packet::Init { timestamp, .. } => timestamp,
        }
    }
}

fn malformed(message: impl Into<String>) -> LocaliserError {
    LocaliserError::MalformedPacket(message.into())
}

fn parse_field(name: &str, raw: &str) -> LocaliserResult<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| malformed(format!("{} is not a number: {:?}", name, raw)))?;
    if !value.is_finite() {
        return Err(malformed(format!("{} is not finite: {:?}", name, raw)));
    }
    Ok(value)
}

fn expect_fields(kind: &str, fields: &[&str], expected: usize) -> LocaliserResult<()> {
    if fields.len() != expected {
        return Err(malformed(format!(
            "{} packet needs {} fields, got {}",
            kind,
            expected,
            fields.len()
        )));
    }
    Ok(())
}

fn checked_point(lat: f64, lon: f64) -> LocaliserResult<GeoPoint> {
    let point = GeoPoint::new(lat, lon);
    point.validate().map_err(|err| malformed(err.to_string()))?;
    Ok(point)
}

impl FromStr for Packet {
    type Err = LocaliserError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let line = raw.trim();
        let fields: Vec<&str> = line.split(',').collect();

        match fields[0] {
            "WIND" => {
                expect_fields("WIND", &fields, 4)?;
                let timestamp = parse_field("timestamp", fields[1])?;
                let direction_deg = parse_field("direction_deg", fields[2])?;
                let speed_mps = parse_field("speed_mps", fields[3])?;
                if !(0.0..360.0).contains(&direction_deg) {
                    return Err(malformed(format!(
                        "wind direction {} outside [0, 360)",
                        direction_deg
                    )));
                }
                if speed_mps < 0.0 {
                    return Err(malformed(format!("negative wind speed {}", speed_mps)));
                }
                Ok(Packet::Wind {
                    timestamp,
                    direction_deg,
                    speed_mps,
                })
            }
            "UAV" => {
                expect_fields("UAV", &fields, 6)?;
                let timestamp = parse_field("timestamp", fields[1])?;
                let point = checked_point(
                    parse_field("lat", fields[2])?,
                    parse_field("lon", fields[3])?,
                )?;
                let alt = parse_field("alt_m", fields[4])?;
                let co2_ppm = parse_field("co2_ppm", fields[5])?;
                if co2_ppm < 0.0 {
                    return Err(malformed(format!("negative concentration {}", co2_ppm)));
                }
                Ok(Packet::Uav {
                    timestamp,
                    position: Position::new(point.lat, point.lon, alt),
                    co2_ppm,
                })
            }
            "INIT" => {
                expect_fields("INIT", &fields, 4)?;
                let timestamp = parse_field("timestamp", fields[1])?;
                let ground_station = checked_point(
                    parse_field("ground_lat", fields[2])?,
                    parse_field("ground_lon", fields[3])?,
                )?;
                Ok(Packet::Init {
                    timestamp,
                    ground_station,
                })
            }
            other => Err(malformed(format!("unknown packet kind {:?}", other))),
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Packet::Wind {
                timestamp,
                direction_deg,
                speed_mps,
            } => write!(f, "WIND,{:.2},{:.1},{:.1}", timestamp, direction_deg, speed_mps),
            Packet::Uav {
                timestamp,
                position,
                co2_ppm,
            } => write!(
                f,
                "UAV,{:.2},{:.6},{:.6},{:.1},{:.1}",
                timestamp, position.lat, position.lon, position.alt, co2_ppm
            ),
            Packet::Init {
                timestamp,
                ground_station,
            } => write!(
                f,
                "INIT,{:.2},{:.6},{:.6}",
                timestamp, ground_station.lat, ground_station.lon
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wind_packet() {
        let packet: Packet = "WIND,1718000000.25,270.0,3.5\n".parse().unwrap();
        assert_eq!(
            packet,
            Packet::Wind {
                timestamp: 1718000000.25,
                direction_deg: 270.0,
                speed_mps: 3.5,
            }
        );
        assert_eq!(packet.kind(), "WIND");
    }

    #[test]
    fn formats_uav_reply_with_fixed_precision() {
        let packet = Packet::Uav {
            timestamp: 12.5,
            position: Position::new(-31.95021234, 115.8563, 50.04),
            co2_ppm: 415.26,
        };
        assert_eq!(packet.to_string(), "UAV,12.50,-31.950212,115.856300,50.0,415.3");
    }

    #[test]
    fn init_packet_survives_formatting() {
        let raw = "INIT,100.00,-31.951000,115.857000";
        let packet: Packet = raw.parse().unwrap();
        assert_eq!(packet.to_string(), raw);
        match packet {
            Packet::Init { ground_station, .. } => {
                assert_eq!(ground_station, GeoPoint::new(-31.951, 115.857))
            }
            other => panic!("unexpected packet {:?}", other),
        }
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = "WIND,1.0,270.0".parse::<Packet>().unwrap_err();
        assert!(err.to_string().contains("needs 4 fields"));
        assert!("UAV,1.0,0.0,0.0,50.0".parse::<Packet>().is_err());
    }

    #[test]
    fn rejects_unknown_kind_and_bad_numbers() {
        assert!("PING,1.0".parse::<Packet>().is_err());
        assert!("".parse::<Packet>().is_err());
        assert!("WIND,abc,270.0,3.5".parse::<Packet>().is_err());
        assert!("WIND,1.0,NaN,3.5".parse::<Packet>().is_err());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!("WIND,1.0,360.0,3.5".parse::<Packet>().is_err());
        assert!("WIND,1.0,90.0,-1.0".parse::<Packet>().is_err());
        assert!("INIT,1.0,95.0,115.0".parse::<Packet>().is_err());
        assert!("UAV,1.0,0.0,0.0,50.0,-3.0".parse::<Packet>().is_err());
    }
}
