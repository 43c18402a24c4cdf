use crate::bridge::model::StatusModel;
use crate::link::GroundLink;
use plumecore::clock::Clock;
use serde_json::json;
use std::{net::SocketAddr, sync::Arc, thread};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

pub fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// `POST /packet` takes one text packet and answers with the reply packet;
/// `GET /status` serves the current [`StatusModel`] as JSON.
pub fn routes<C>(
    link: Arc<GroundLink<C>>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
where
    C: Clock + Send + Sync + 'static,
{
    let link_filter = warp::any().map(move || link.clone());

    let packet_route = warp::path("packet")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::bytes())
        .and(link_filter.clone())
        .map(|body: warp::hyper::body::Bytes, link: Arc<GroundLink<C>>| {
            let text = String::from_utf8_lossy(&body);
            match link.handle(&text) {
                Ok(reply) => warp::reply::with_status(reply.to_string(), StatusCode::OK),
                Err(err) => {
                    log::warn!("packet rejected: {:#}", err);
                    warp::reply::with_status(format!("{:#}", err), StatusCode::BAD_REQUEST)
                }
            }
        });

    let status_route = warp::path("status")
        .and(warp::path::end())
        .and(warp::get())
        .and(link_filter)
        .map(
            |link: Arc<GroundLink<C>>| match link.with_engine(StatusModel::capture) {
                Ok(status) => {
                    warp::reply::with_status(warp::reply::json(&status), StatusCode::OK)
                }
                Err(err) => warp::reply::with_status(
                    warp::reply::json(&json!({ "error": err.to_string() })),
                    StatusCode::INTERNAL_SERVER_ERROR,
                ),
            },
        );

    packet_route.or(status_route)
}

/// HTTP front of the radio link, served from its own thread.
pub struct PacketBridge {
    addr: SocketAddr,
}

impl PacketBridge {
    pub fn start<C>(link: Arc<GroundLink<C>>, addr: SocketAddr) -> Self
    where
        C: Clock + Send + Sync + 'static,
    {
        let filter = routes(link);
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    log::error!("packet bridge runtime failed to start: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(filter).run(addr).await;
            });
        });
        log::info!("packet bridge listening on http://{}", addr);
        Self { addr }
    }

    pub fn publish_status(&self, message: &str) {
        println!("[LINK {}] {}", self.addr, message);
    }
}
