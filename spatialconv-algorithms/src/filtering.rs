//! Filtering algorithms

use spatialconv_core::{Error, PointCloud, Result};
use std::collections::HashSet;

/// Voxel grid filtering
///
/// This algorithm reduces the density of a point cloud by grouping points into voxels
/// and keeping only one representative point per voxel: the first one, in input order.
/// Voxels are cubes of side `voxel_size` anchored at the minimum corner of the cloud's
/// bounding box. Attributes of kept points are kept with them, and the output lists the
/// representatives in the order their voxels were first occupied.
///
/// # Arguments
/// * `cloud` - Input point cloud
/// * `voxel_size` - Size of each voxel cube
///
/// # Returns
/// * `Result<PointCloud>` - Downsampled point cloud
///
/// # Example
/// ```rust
/// use spatialconv_core::{PointCloud, Point3D};
/// use spatialconv_algorithms::voxel_grid_filter;
///
/// fn main() -> spatialconv_core::Result<()> {
///     let cloud = PointCloud::from_points(vec![
///         Point3D::new(0.0, 0.0, 0.0),
///         Point3D::new(0.1, 0.0, 0.0),
///         Point3D::new(0.0, 0.1, 0.0),
///         Point3D::new(0.0, 0.0, 0.1),
///     ]);
///
///     let filtered = voxel_grid_filter(&cloud, 0.2)?;
///     assert_eq!(filtered.len(), 1);
///     Ok(())
/// }
/// ```
pub fn voxel_grid_filter(cloud: &PointCloud, voxel_size: f64) -> Result<PointCloud> {
    if !voxel_size.is_finite() || voxel_size <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "voxel_size must be positive, got {}",
            voxel_size
        )));
    }

    let Some(bounds) = cloud.bounding_box() else {
        return Ok(cloud.clone());
    };
    let min = bounds.min;

    let voxel_of = |index: usize| -> (i64, i64, i64) {
        let p = cloud[index];
        (
            ((p.x - min.x) / voxel_size).floor() as i64,
            ((p.y - min.y) / voxel_size).floor() as i64,
            ((p.z - min.z) / voxel_size).floor() as i64,
        )
    };

    let mut occupied = HashSet::new();
    let mut kept = Vec::new();
    for index in 0..cloud.len() {
        if occupied.insert(voxel_of(index)) {
            kept.push(index);
        }
    }

    tracing::debug!(
        input = cloud.len(),
        output = kept.len(),
        voxel_size,
        "Voxel grid filter"
    );

    cloud.select(&kept)
}
