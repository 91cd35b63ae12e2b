use std::{
    hash::{Hash, Hasher},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use fxhash::FxHasher64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    coordinate::Coordinate, error::ServiceError, routing_provider::RoutingProvider,
    service::TravelTimeService,
};

#[derive(Serialize, Deserialize)]
struct CachedTravelTimesEntry {
    times: Vec<f64>,
}

fn hash_points<H: Hasher>(points: &[Coordinate], hasher: &mut H) {
    points.len().hash(hasher);
    for point in points {
        hasher.write_u64(point.longitude().to_bits());
        hasher.write_u64(point.latitude().to_bits());
    }
}

fn get_filename(
    origin: &Coordinate,
    destinations: &[Coordinate],
    provider: &RoutingProvider,
) -> String {
    let mut hasher = FxHasher64::default();

    hash_points(std::slice::from_ref(origin), &mut hasher);
    hash_points(destinations, &mut hasher);
    provider.hash(&mut hasher);

    format!("{:016x}.json", hasher.finish())
}

/// Travel times stored as one json file per (provider, origin,
/// destinations) key.
pub struct FileCache {
    folder: PathBuf,
}

impl FileCache {
    pub fn new(folder: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let folder = folder.into();
        if !folder.is_dir() {
            return Err(anyhow::anyhow!(
                "Path {} is not a directory",
                folder.display()
            ));
        }

        Ok(Self { folder })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn get(
        &self,
        origin: &Coordinate,
        destinations: &[Coordinate],
        provider: &RoutingProvider,
    ) -> anyhow::Result<Option<Vec<f64>>> {
        let file_path = self
            .folder
            .join(get_filename(origin, destinations, provider));

        if !file_path.is_file() {
            return Ok(None);
        }

        let file = std::fs::File::open(file_path)?;
        let entry: CachedTravelTimesEntry = serde_json::from_reader(file)?;

        Ok(Some(entry.times))
    }

    pub fn put(
        &self,
        origin: &Coordinate,
        destinations: &[Coordinate],
        provider: &RoutingProvider,
        times: &[f64],
    ) -> anyhow::Result<()> {
        let filename = get_filename(origin, destinations, provider);

        let file = std::fs::File::create(self.folder.join(filename))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(
            &mut writer,
            &CachedTravelTimesEntry {
                times: times.to_vec(),
            },
        )?;
        writer.flush()?;

        Ok(())
    }
}

/// Wraps a [`TravelTimeService`] and consults a [`FileCache`] first, when
/// one is configured. Cache failures are logged and never fail the lookup.
pub struct CachedTravelTimes<S> {
    inner: S,
    cache: Option<FileCache>,
    provider: RoutingProvider,
}

impl<S> CachedTravelTimes<S> {
    pub fn new(inner: S, cache: Option<FileCache>, provider: RoutingProvider) -> Self {
        Self {
            inner,
            cache,
            provider,
        }
    }
}

impl<S: TravelTimeService> TravelTimeService for CachedTravelTimes<S> {
    async fn fetch_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<f64>, ServiceError> {
        let Some(cache) = &self.cache else {
            return self.inner.fetch_travel_times(origin, destinations).await;
        };

        match cache.get(&origin, destinations, &self.provider) {
            Ok(Some(times)) if times.len() == destinations.len() => {
                debug!("Travel times cache hit for {} destinations", times.len());
                return Ok(times);
            }
            Ok(_) => {}
            Err(err) => warn!("Failed to read travel times cache: {}", err),
        }

        let times = self.inner.fetch_travel_times(origin, destinations).await?;

        if let Err(err) = cache.put(&origin, destinations, &self.provider, &times) {
            warn!("Failed to write travel times cache: {}", err);
        }

        Ok(times)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingService {
        calls: AtomicUsize,
    }

    impl TravelTimeService for CountingService {
        async fn fetch_travel_times(
            &self,
            _origin: Coordinate,
            destinations: &[Coordinate],
        ) -> Result<Vec<f64>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(destinations.iter().map(|d| d.latitude()).collect())
        }
    }

    fn temp_folder(name: &str) -> PathBuf {
        let folder = std::env::temp_dir().join(format!(
            "courier_cache_{}_{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&folder).unwrap();
        folder
    }

    #[test]
    fn test_filename_depends_on_provider_and_points() {
        let origin = Coordinate::new(51.504, -0.1129).unwrap();
        let destinations = [Coordinate::new(51.5, -0.1).unwrap()];

        let crow = RoutingProvider::AsTheCrowFlies { speed_kmh: 50.0 };
        let a = get_filename(&origin, &destinations, &crow);
        let b = get_filename(&origin, &destinations, &RoutingProvider::TomTom);
        let c = get_filename(&origin, &[], &crow);

        assert_eq!(a, get_filename(&origin, &destinations, &crow));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rejects_missing_folder() {
        assert!(FileCache::new("/definitely/not/a/courier/folder").is_err());
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let folder = temp_folder("hit");
        let service = CachedTravelTimes::new(
            CountingService {
                calls: AtomicUsize::new(0),
            },
            Some(FileCache::new(&folder).unwrap()),
            RoutingProvider::TomTom,
        );

        let origin = Coordinate::new(51.504, -0.1129).unwrap();
        let destinations = [
            Coordinate::new(51.51, -0.12).unwrap(),
            Coordinate::new(51.5, -0.1).unwrap(),
        ];

        let first = service
            .fetch_travel_times(origin, &destinations)
            .await
            .unwrap();
        let second = service
            .fetch_travel_times(origin, &destinations)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(service.inner.calls.load(Ordering::SeqCst), 1);

        std::fs::remove_dir_all(folder).ok();
    }
}
