use crossbeam_channel::{unbounded, Receiver, Sender};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::source::TileSource;
use crate::core::geo::TileCoord;
use crate::prelude::{HashMap, HashSet};
use crate::Result;

/// Shared async HTTP client for tile fetching
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("ilocos-planner/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(30))
        .pool_idle_timeout(std::time::Duration::from_secs(90))
        .build()
        .unwrap_or_else(|err| {
            log::error!("failed to configure tile HTTP client, using defaults: {}", err);
            reqwest::Client::new()
        })
});

/// Result of a tile loading operation
#[derive(Debug)]
pub struct TileResult {
    pub coord: TileCoord,
    pub data: Result<Vec<u8>>,
}

/// Configuration for the tile loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLoaderConfig {
    /// Maximum concurrent tile downloads
    pub max_concurrent: usize,
    /// Attempts per tile, including the first
    pub max_attempts: usize,
    pub retry_delay_ms: u64,
    pub cache_capacity: usize,
    /// Never touch the network; tiles must be inserted into the cache by hand
    pub offline: bool,
}

impl Default for TileLoaderConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 16,
            max_attempts: 2,
            retry_delay_ms: 100,
            cache_capacity: 512,
            offline: false,
        }
    }
}

impl TileLoaderConfig {
    pub fn for_testing() -> Self {
        Self {
            max_concurrent: 4,
            max_attempts: 1,
            retry_delay_ms: 0,
            cache_capacity: 64,
            offline: true,
        }
    }
}

/// Spawns tile downloads on the ambient tokio runtime and hands finished
/// tiles back through a channel drained on the UI thread.
pub struct TileLoader {
    config: TileLoaderConfig,
    tx: Sender<TileResult>,
    rx: Receiver<TileResult>,
    in_flight: HashSet<TileCoord>,
    #[cfg(feature = "tokio-runtime")]
    handles: HashMap<TileCoord, tokio::task::JoinHandle<()>>,
    warned_no_runtime: bool,
}

impl TileLoader {
    pub fn new(config: TileLoaderConfig) -> Self {
        let (tx, rx) = unbounded();
        Self {
            config,
            tx,
            rx,
            in_flight: HashSet::default(),
            #[cfg(feature = "tokio-runtime")]
            handles: HashMap::default(),
            warned_no_runtime: false,
        }
    }

    pub fn config(&self) -> &TileLoaderConfig {
        &self.config
    }

    /// Starts downloading `coord` unless it is already in flight or the loader is saturated.
    /// Returns whether a download was started.
    pub fn request(&mut self, source: &dyn TileSource, coord: TileCoord) -> bool {
        if self.config.offline
            || self.in_flight.contains(&coord)
            || self.in_flight.len() >= self.config.max_concurrent
        {
            return false;
        }
        self.spawn_download(source.url(coord), coord)
    }

    #[cfg(feature = "tokio-runtime")]
    fn spawn_download(&mut self, url: String, coord: TileCoord) -> bool {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                if !self.warned_no_runtime {
                    log::warn!("no tokio runtime available; tiles will not be downloaded");
                    self.warned_no_runtime = true;
                }
                return false;
            }
        };

        let tx = self.tx.clone();
        let attempts = self.config.max_attempts.max(1);
        let retry_delay = std::time::Duration::from_millis(self.config.retry_delay_ms);

        let task = handle.spawn(async move {
            let data = fetch_with_retry(&url, coord, attempts, retry_delay).await;
            // receiver gone means the map was torn down
            let _ = tx.send(TileResult { coord, data });
        });

        self.in_flight.insert(coord);
        self.handles.insert(coord, task);
        true
    }

    #[cfg(not(feature = "tokio-runtime"))]
    fn spawn_download(&mut self, _url: String, _coord: TileCoord) -> bool {
        if !self.warned_no_runtime {
            log::warn!("built without the tokio-runtime feature; tiles will not be downloaded");
            self.warned_no_runtime = true;
        }
        false
    }

    /// Collects every finished download
    pub fn drain(&mut self) -> Vec<TileResult> {
        let results: Vec<TileResult> = self.rx.try_iter().collect();
        for result in &results {
            self.in_flight.remove(&result.coord);
            #[cfg(feature = "tokio-runtime")]
            self.handles.remove(&result.coord);
        }
        results
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_loading(&self, coord: &TileCoord) -> bool {
        self.in_flight.contains(coord)
    }

    /// Aborts every outstanding download
    pub fn cancel_all(&mut self) {
        #[cfg(feature = "tokio-runtime")]
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
        if !self.in_flight.is_empty() {
            log::debug!("cancelled {} tile downloads", self.in_flight.len());
        }
        self.in_flight.clear();
    }
}

impl Drop for TileLoader {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(feature = "tokio-runtime")]
async fn fetch_with_retry(
    url: &str,
    coord: TileCoord,
    attempts: usize,
    retry_delay: std::time::Duration,
) -> Result<Vec<u8>> {
    let mut attempt = 1;
    loop {
        log::debug!("fetch tile {:?} attempt {}", coord, attempt);
        match fetch_tile(url).await {
            Ok(data) => {
                log::debug!("downloaded tile {:?} ({} bytes)", coord, data.len());
                return Ok(data);
            }
            Err(err) if attempt < attempts => {
                log::warn!("tile {:?} download failed on attempt {}: {}", coord, attempt, err);
                tokio::time::sleep(retry_delay).await;
                attempt += 1;
            }
            Err(err) => {
                log::warn!("giving up on tile {:?}: {}", coord, err);
                return Err(err);
            }
        }
    }
}

#[cfg(feature = "tokio-runtime")]
async fn fetch_tile(url: &str) -> Result<Vec<u8>> {
    // errors carry the URL by default, which includes the access token
    let response = HTTP_CLIENT
        .get(url)
        .send()
        .await
        .map_err(|err| err.without_url())?
        .error_for_status()
        .map_err(|err| err.without_url())?;
    let bytes = response.bytes().await.map_err(|err| err.without_url())?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::source::MapboxStyleSource;

    #[test]
    fn test_offline_loader_never_requests() {
        let mut loader = TileLoader::new(TileLoaderConfig::for_testing());
        let source = MapboxStyleSource::new("mapbox/streets-v12", "pk.test");
        assert!(!loader.request(&source, TileCoord::new(0, 0, 0)));
        assert_eq!(loader.in_flight(), 0);
        assert!(loader.drain().is_empty());
    }

    #[test]
    fn test_without_runtime_request_is_refused() {
        let config = TileLoaderConfig {
            offline: false,
            ..TileLoaderConfig::for_testing()
        };
        let mut loader = TileLoader::new(config);
        let source = MapboxStyleSource::new("mapbox/streets-v12", "pk.test");
        assert!(!loader.request(&source, TileCoord::new(0, 0, 0)));
        assert_eq!(loader.in_flight(), 0);
    }

    #[cfg(feature = "tokio-runtime")]
    #[tokio::test]
    async fn test_failed_download_is_reported_and_cleared() {
        struct Unreachable;
        impl TileSource for Unreachable {
            fn url(&self, _coord: TileCoord) -> String {
                // port 9 (discard) on loopback refuses connections immediately
                "http://127.0.0.1:9/tile.png".to_string()
            }
            fn attribution(&self) -> &str {
                ""
            }
        }

        let config = TileLoaderConfig {
            offline: false,
            ..TileLoaderConfig::for_testing()
        };
        let mut loader = TileLoader::new(config);
        let coord = TileCoord::new(1, 1, 1);

        assert!(loader.request(&Unreachable, coord));
        assert!(!loader.request(&Unreachable, coord), "duplicate request must be ignored");
        assert!(loader.is_loading(&coord));

        let mut results = Vec::new();
        for _ in 0..200 {
            results = loader.drain();
            if !results.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(25)).await;
        }

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].coord, coord);
        assert!(results[0].data.is_err());
        assert_eq!(loader.in_flight(), 0);
    }
}
