//! Configuration loaders for success and failure paths.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use tempfile::TempDir;

use dockworker_config::{Config, SocketEndpoint};

use crate::bootstrap::ConfigLoader;

/// Loader that places the bus socket under a temporary directory.
#[derive(Clone)]
pub struct TestConfigLoader {
    socket_dir: Arc<TempDir>,
}

impl TestConfigLoader {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temporary socket directory");
        Self {
            socket_dir: Arc::new(dir),
        }
    }

    pub fn socket_path(&self) -> PathBuf {
        self.socket_dir.path().join("bus").join("dockworkerd.sock")
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let path = self.socket_path();
        let path = path
            .to_str()
            .expect("temporary socket path was not valid UTF-8");
        Ok(Config {
            bus_socket: SocketEndpoint::unix(path),
            ..Config::default()
        })
    }
}

/// Loader that fails by passing an invalid socket on the command line.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load_from_iter([
            OsString::from("dockworkerd"),
            OsString::from("--bus-socket"),
            OsString::from("invalid://socket"),
        ])
    }
}
