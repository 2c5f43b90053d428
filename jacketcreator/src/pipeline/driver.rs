//! The pipeline driver.

use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{self, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::bundle::{
    assemble, AssetIdentifiers, BundleDescription, BundleSerializer, PlatformTarget, SongId,
    UnityFsSerializer,
};
use crate::config::{ConfigError, ConfigFile};
use crate::image_source;
use crate::pipeline::{JacketRequest, PipelineError, PipelineResult, PipelineSummary};
use crate::texture::TextureVariantBuilder;

/// Orchestrates a jacket build from source image to bundle files.
///
/// The driver is the only component that touches the output directory.
/// Every step either succeeds or aborts the run with the first error.
///
/// # Example
///
/// ```no_run
/// use jacketcreator::config::ConfigFile;
/// use jacketcreator::pipeline::{JacketRequest, PipelineDriver};
///
/// let driver = PipelineDriver::from_config(&ConfigFile::default())?;
/// let summary = driver.run(&JacketRequest::new("cover.png", "out", 10042, 100, 200))?;
/// assert_eq!(summary.song_id.value(), 42);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct PipelineDriver {
    builder: TextureVariantBuilder,
    serializer: Arc<dyn BundleSerializer>,
}

impl fmt::Debug for PipelineDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineDriver")
            .field("builder", &self.builder)
            .field("serializer", &self.serializer.name())
            .finish()
    }
}

impl PipelineDriver {
    /// Create a driver from explicit collaborators.
    pub fn new(builder: TextureVariantBuilder, serializer: Arc<dyn BundleSerializer>) -> Self {
        Self {
            builder,
            serializer,
        }
    }

    /// Create a driver with the stock encoders and UnityFS serializer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration fails validation.
    pub fn from_config(config: &ConfigFile) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            TextureVariantBuilder::with_default_encoders(config.texture.clone()),
            Arc::new(UnityFsSerializer::new(config.bundle.clone())),
        ))
    }

    /// Build both platform bundles for a request.
    ///
    /// Files already written for an earlier platform stay on disk if a later
    /// platform fails; the failing platform never leaves a partial file.
    pub fn run(&self, request: &JacketRequest) -> PipelineResult<PipelineSummary> {
        let song_id = SongId::normalize(request.song_id);
        let ids = AssetIdentifiers::new(song_id, request.pvr_path_id, request.dds_path_id);

        validate_image_path(&request.image_path)?;
        validate_path_ids(&ids)?;
        let output_dir = prepare_output_dir(&request.output_dir)?;

        info!(
            image = %request.image_path.display(),
            output_dir = %output_dir.display(),
            song_id = %song_id,
            pvr_path_id = ids.pvr_path_id,
            dds_path_id = ids.dds_path_id,
            "Building jacket bundles"
        );

        let image = image_source::load(&request.image_path)?;
        info!(width = image.width(), height = image.height(), "Source image loaded");

        let variants = self.builder.build_variants(image)?;

        let mut files = Vec::with_capacity(PlatformTarget::ALL.len());
        for platform in PlatformTarget::ALL {
            let bundle = assemble(&variants.small, &variants.medium, ids, platform);
            let path = output_dir.join(bundle.file_name());
            self.write_bundle(&bundle, &output_dir, &path)?;
            files.push(path);
        }

        Ok(PipelineSummary {
            output_dir,
            song_id,
            files,
        })
    }

    /// Serialize one bundle to `path` via a temporary file in `dir`.
    ///
    /// The temporary file is deleted on every failure path and renamed over
    /// `path` only after a complete, flushed write.
    fn write_bundle(
        &self,
        bundle: &BundleDescription<'_>,
        dir: &Path,
        path: &Path,
    ) -> PipelineResult<()> {
        let platform = bundle.platform;
        let mut temp = tempfile::Builder::new()
            .prefix(".jacket_")
            .suffix(".partial")
            .tempfile_in(dir)
            .map_err(|source| PipelineError::OutputDir {
                path: dir.to_path_buf(),
                source,
            })?;

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            self.serializer
                .serialize(bundle, &mut writer)
                .map_err(|source| PipelineError::Serialize {
                    platform,
                    path: path.to_path_buf(),
                    source,
                })?;
            writer.flush().map_err(|source| PipelineError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }

        temp.as_file()
            .sync_all()
            .map_err(|source| PipelineError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file = temp.persist(path).map_err(|err| PipelineError::Io {
            path: path.to_path_buf(),
            source: err.error,
        })?;

        let size = file.metadata().map(|m| m.len()).unwrap_or_default();
        info!(
            platform = %platform,
            path = %path.display(),
            size_bytes = size,
            serializer = self.serializer.name(),
            "Bundle written"
        );
        Ok(())
    }
}

fn validate_image_path(path: &Path) -> PipelineResult<()> {
    if path.as_os_str().is_empty() {
        return Err(PipelineError::InvalidInput(
            "image file path is empty".to_string(),
        ));
    }
    if !path.is_file() {
        return Err(PipelineError::InvalidInput(format!(
            "image file '{}' is not found",
            path.display()
        )));
    }
    Ok(())
}

fn validate_path_ids(ids: &AssetIdentifiers) -> PipelineResult<()> {
    if ids.pvr_path_id == ids.dds_path_id {
        return Err(PipelineError::InvalidInput(format!(
            "PVR and DDS path IDs must differ, both are {}",
            ids.pvr_path_id
        )));
    }
    Ok(())
}

/// Resolve `dir` to an absolute path and create it if needed.
fn prepare_output_dir(dir: &Path) -> PipelineResult<PathBuf> {
    let output_err = |source| PipelineError::OutputDir {
        path: dir.to_path_buf(),
        source,
    };

    let resolved = path::absolute(dir).map_err(output_err)?;
    if !resolved.is_dir() {
        debug!(path = %resolved.display(), "Creating output directory");
        fs::create_dir_all(&resolved).map_err(|source| PipelineError::OutputDir {
            path: resolved.clone(),
            source,
        })?;
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::BundleError;
    use crate::config::TextureConfig;
    use crate::image_source::ImageSourceError;
    use crate::texture::{TextureEncoder, TextureError, TextureFormat, VariantKind};
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    /// Writes the first bytes, then fails on the given platform.
    struct FailingSerializer {
        fail_on: PlatformTarget,
    }

    impl BundleSerializer for FailingSerializer {
        fn serialize(
            &self,
            bundle: &BundleDescription<'_>,
            sink: &mut dyn Write,
        ) -> Result<(), BundleError> {
            sink.write_all(b"partial bundle data")?;
            if bundle.platform == self.fail_on {
                return Err(BundleError::EmptyPayload(VariantKind::Small));
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Records every description it is given.
    #[derive(Default)]
    struct CountingSerializer {
        calls: AtomicUsize,
    }

    impl BundleSerializer for CountingSerializer {
        fn serialize(
            &self,
            bundle: &BundleDescription<'_>,
            sink: &mut dyn Write,
        ) -> Result<(), BundleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            writeln!(
                sink,
                "{} {} {} {}",
                bundle.platform.slug(),
                bundle.ids.song_id,
                bundle.ids.pvr_path_id,
                bundle.ids.dds_path_id
            )?;
            sink.write_all(bundle.small.data())?;
            sink.write_all(bundle.medium.data())?;
            Ok(())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    struct FixedEncoder(u8);

    impl TextureEncoder for FixedEncoder {
        fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, TextureError> {
            Ok(vec![self.0; image.width() as usize])
        }

        fn expected_size(&self, width: u32, _height: u32) -> usize {
            width as usize
        }

        fn extension(&self) -> &str {
            "bin"
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn texture_format(&self) -> TextureFormat {
            TextureFormat::Dxt1
        }
    }

    fn mock_builder() -> TextureVariantBuilder {
        TextureVariantBuilder::new(
            TextureConfig::default().with_sizes(8, 16),
            Arc::new(FixedEncoder(0xAA)),
            Arc::new(FixedEncoder(0xBB)),
        )
    }

    fn write_image(dir: &Path) -> PathBuf {
        let path = dir.join("cover.png");
        RgbaImage::from_pixel(20, 20, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        path
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_run_writes_both_platforms_in_order() {
        let temp = tempdir().unwrap();
        let image = write_image(temp.path());
        let out = temp.path().join("out");
        let serializer = Arc::new(CountingSerializer::default());
        let driver = PipelineDriver::new(mock_builder(), serializer.clone());

        let summary = driver
            .run(&JacketRequest::new(&image, &out, 10042, 100, 200))
            .unwrap();

        assert_eq!(summary.song_id.value(), 42);
        assert!(summary.output_dir.is_absolute());
        assert_eq!(
            summary.files,
            vec![
                summary.output_dir.join("jacket_42_android.unity3d"),
                summary.output_dir.join("jacket_42_ios.unity3d"),
            ]
        );
        assert_eq!(serializer.calls.load(Ordering::SeqCst), 2);

        let android = fs::read(&summary.files[0]).unwrap();
        assert!(android.starts_with(b"android 42 100 200\n"));
        assert!(android.ends_with(&[0xBB; 16]));
        let ios = fs::read(&summary.files[1]).unwrap();
        assert!(ios.starts_with(b"ios 42 100 200\n"));
    }

    #[test]
    fn test_run_negative_song_id() {
        let temp = tempdir().unwrap();
        let image = write_image(temp.path());
        let driver = PipelineDriver::new(mock_builder(), Arc::new(CountingSerializer::default()));

        let summary = driver
            .run(&JacketRequest::new(&image, temp.path().join("out"), -3, 1, 2))
            .unwrap();

        assert_eq!(summary.song_id.value(), 3);
        assert_eq!(
            entries(&summary.output_dir),
            vec!["jacket_3_android.unity3d", "jacket_3_ios.unity3d"]
        );
    }

    #[test]
    fn test_missing_image_creates_nothing() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("out");
        let driver = PipelineDriver::new(mock_builder(), Arc::new(CountingSerializer::default()));

        let err = driver
            .run(&JacketRequest::new(temp.path().join("missing.png"), &out, 1, 1, 2))
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidInput(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_equal_path_ids_rejected_before_output_dir() {
        let temp = tempdir().unwrap();
        let image = write_image(temp.path());
        let out = temp.path().join("out");
        let serializer = Arc::new(CountingSerializer::default());
        let driver = PipelineDriver::new(mock_builder(), serializer.clone());

        let err = driver
            .run(&JacketRequest::new(&image, &out, 1, 7, 7))
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidInput(_)));
        assert!(err.to_string().contains("7"));
        assert!(!out.exists());
        assert_eq!(serializer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_image_path() {
        let temp = tempdir().unwrap();
        let driver = PipelineDriver::new(mock_builder(), Arc::new(CountingSerializer::default()));

        let err = driver
            .run(&JacketRequest::new("", temp.path().join("out"), 1, 1, 2))
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput(_)));
    }

    #[test]
    fn test_decode_failure_writes_no_files() {
        let temp = tempdir().unwrap();
        let image = temp.path().join("cover.png");
        fs::write(&image, "plain text").unwrap();
        let out = temp.path().join("out");
        let serializer = Arc::new(CountingSerializer::default());
        let driver = PipelineDriver::new(mock_builder(), serializer.clone());

        let err = driver
            .run(&JacketRequest::new(&image, &out, 1, 1, 2))
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Image(ImageSourceError::Decode { .. })
        ));
        assert_eq!(serializer.calls.load(Ordering::SeqCst), 0);
        assert!(entries(&out).is_empty());
    }

    #[test]
    fn test_output_dir_under_file_fails() {
        let temp = tempdir().unwrap();
        let image = write_image(temp.path());
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "existing").unwrap();
        let driver = PipelineDriver::new(mock_builder(), Arc::new(CountingSerializer::default()));

        let err = driver
            .run(&JacketRequest::new(&image, blocker.join("out"), 1, 1, 2))
            .unwrap_err();

        assert!(matches!(err, PipelineError::OutputDir { .. }));
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "existing");
    }

    #[test]
    fn test_serializer_failure_leaves_no_partial_file() {
        let temp = tempdir().unwrap();
        let image = write_image(temp.path());
        let out = temp.path().join("out");
        let driver = PipelineDriver::new(
            mock_builder(),
            Arc::new(FailingSerializer {
                fail_on: PlatformTarget::Ios,
            }),
        );

        let err = driver
            .run(&JacketRequest::new(&image, &out, 5, 1, 2))
            .unwrap_err();

        match err {
            PipelineError::Serialize { platform, path, .. } => {
                assert_eq!(platform, PlatformTarget::Ios);
                assert!(path.ends_with("jacket_5_ios.unity3d"));
            }
            other => panic!("expected Serialize error, got {:?}", other),
        }
        // Android finished before iOS failed; no temp file is left behind
        assert_eq!(entries(&out), vec!["jacket_5_android.unity3d"]);
    }

    #[test]
    fn test_first_platform_failure_stops_run() {
        let temp = tempdir().unwrap();
        let image = write_image(temp.path());
        let out = temp.path().join("out");
        let driver = PipelineDriver::new(
            mock_builder(),
            Arc::new(FailingSerializer {
                fail_on: PlatformTarget::Android,
            }),
        );

        let err = driver
            .run(&JacketRequest::new(&image, &out, 5, 1, 2))
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Serialize {
                platform: PlatformTarget::Android,
                ..
            }
        ));
        assert!(entries(&out).is_empty());
    }

    #[test]
    fn test_failed_rerun_keeps_previous_file() {
        let temp = tempdir().unwrap();
        let image = write_image(temp.path());
        let out = temp.path().join("out");

        PipelineDriver::new(mock_builder(), Arc::new(CountingSerializer::default()))
            .run(&JacketRequest::new(&image, &out, 5, 1, 2))
            .unwrap();
        let before = fs::read(out.join("jacket_5_android.unity3d")).unwrap();

        PipelineDriver::new(
            mock_builder(),
            Arc::new(FailingSerializer {
                fail_on: PlatformTarget::Android,
            }),
        )
        .run(&JacketRequest::new(&image, &out, 5, 1, 2))
        .unwrap_err();

        assert_eq!(fs::read(out.join("jacket_5_android.unity3d")).unwrap(), before);
    }

    #[test]
    fn test_rerun_overwrites() {
        let temp = tempdir().unwrap();
        let image = write_image(temp.path());
        let out = temp.path().join("out");
        let driver = PipelineDriver::new(mock_builder(), Arc::new(CountingSerializer::default()));

        driver.run(&JacketRequest::new(&image, &out, 5, 1, 2)).unwrap();
        driver.run(&JacketRequest::new(&image, &out, 5, 7, 8)).unwrap();

        let android = fs::read(out.join("jacket_5_android.unity3d")).unwrap();
        assert!(android.starts_with(b"android 5 7 8\n"));
        assert_eq!(entries(&out).len(), 2);
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let mut config = ConfigFile::default();
        config.texture.small_size = 30;
        assert!(PipelineDriver::from_config(&config).is_err());
    }

    #[test]
    fn test_prepare_output_dir_existing() {
        let temp = tempdir().unwrap();
        let resolved = prepare_output_dir(temp.path()).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.is_dir());
    }
}
