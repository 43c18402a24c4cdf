pub mod plume;
