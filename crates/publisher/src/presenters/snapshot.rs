//! SnapshotPresenter - writes presented frames to disk
//!
//! Every N-th presented set is written as `<sequence>.png` (the grayscale
//! view, probe marked) and `<sequence>.ply` (binary point cloud without
//! origin sentinels).

use bytes::{BufMut, BytesMut};
use contracts::{ContractError, FrameProducts, Presenter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

use crate::rgba::to_rgba_image;

/// Configuration for SnapshotPresenter
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Output directory
    pub base_path: PathBuf,
    /// Write every N-th presented set (values below 1 are treated as 1)
    pub every: u64,
    /// Close after this many presents
    pub max_presents: Option<u64>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./snapshots"),
            every: 10,
            max_presents: None,
        }
    }
}

/// Presenter that writes snapshots to disk files
pub struct SnapshotPresenter {
    name: String,
    config: SnapshotConfig,
    presents: u64,
    written: u64,
    open: bool,
}

impl SnapshotPresenter {
    /// Create a new SnapshotPresenter
    pub fn new(name: impl Into<String>, config: SnapshotConfig) -> std::io::Result<Self> {
        // Create base directory if it doesn't exist
        fs::create_dir_all(&config.base_path)?;

        Ok(Self {
            name: name.into(),
            config,
            presents: 0,
            written: 0,
            open: true,
        })
    }

    /// Number of snapshots written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    fn write_snapshot(&mut self, products: &FrameProducts) -> std::io::Result<()> {
        let stem = format!("{:06}", products.sequence);

        let png_path = self.config.base_path.join(format!("{stem}.png"));
        to_rgba_image(products)
            .save(&png_path)
            .map_err(std::io::Error::other)?;

        let ply_path = self.config.base_path.join(format!("{stem}.ply"));
        save_point_cloud(&ply_path, products)?;

        self.written += 1;
        debug!(
            presenter = %self.name,
            sequence = products.sequence,
            path = %png_path.display(),
            "Snapshot written"
        );
        Ok(())
    }
}

/// Write non-sentinel points as binary little-endian PLY
fn save_point_cloud(path: &Path, products: &FrameProducts) -> std::io::Result<()> {
    let points: Vec<&[f32; 3]> = products.valid_points().collect();

    let header = format!(
        "ply\n\
         format binary_little_endian 1.0\n\
         element vertex {}\n\
         property float x\n\
         property float y\n\
         property float z\n\
         end_header\n",
        points.len()
    );

    let mut buf = BytesMut::with_capacity(header.len() + points.len() * 12);
    buf.put_slice(header.as_bytes());
    for p in &points {
        buf.put_f32_le(p[0]);
        buf.put_f32_le(p[1]);
        buf.put_f32_le(p[2]);
    }

    fs::write(path, &buf)
}

impl Presenter for SnapshotPresenter {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_open(&self) -> bool {
        self.open
    }

    #[instrument(
        name = "snapshot_presenter_present",
        skip(self, products),
        fields(presenter = %self.name, sequence = products.sequence)
    )]
    fn present(&mut self, products: &FrameProducts) -> Result<(), ContractError> {
        self.presents += 1;

        let every = self.config.every.max(1);
        let result = if (self.presents - 1) % every == 0 {
            self.write_snapshot(products).map_err(|e| {
                error!(presenter = %self.name, sequence = products.sequence, error = %e, "Write failed");
                ContractError::presenter_write(&self.name, e.to_string())
            })
        } else {
            Ok(())
        };

        if let Some(max) = self.config.max_presents {
            if self.presents >= max {
                self.open = false;
            }
        }
        result
    }

    #[instrument(name = "snapshot_presenter_close", skip(self))]
    fn close(&mut self) -> Result<(), ContractError> {
        self.open = false;
        info!(
            presenter = %self.name,
            presents = self.presents,
            written = self.written,
            "SnapshotPresenter closed"
        );
        Ok(())
    }
}
