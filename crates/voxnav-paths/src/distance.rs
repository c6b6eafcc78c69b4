use voxnav_core::BlockPos;

/// Manhattan (L1) distance between two voxels.
#[inline]
pub fn manhattan(a: BlockPos, b: BlockPos) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs() + (a.z - b.z).abs()
}

/// Squared Euclidean distance between two voxels.
#[inline]
pub fn euclidean_squared(a: BlockPos, b: BlockPos) -> f64 {
    (a.to_vec3() - b.to_vec3()).len_sqr()
}

/// Euclidean distance between two voxels.
#[inline]
pub fn euclidean(a: BlockPos, b: BlockPos) -> f64 {
    euclidean_squared(a, b).sqrt()
}
