pub mod appearance;
pub mod config_io;
pub mod ids;
pub mod logging;
pub mod recovery;
pub mod storage;
