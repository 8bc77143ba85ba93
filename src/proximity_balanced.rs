use crate::index::SpatialIndex;
use crate::kd_balanced::BalancedKdTree;
use rand::prelude::*;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

/// Nearest-neighbor index over a fixed set of 3D points, eagerly built.
///
/// This is the bindings-facing wrapper around [`BalancedKdTree`]. The whole
/// tree is partitioned up front, so `build` is the expensive call and every
/// `nearest` afterwards is a pure read. Points are removed logically with
/// `delete`; the structure is never rebuilt until the next `build`.
#[wasm_bindgen]
pub struct ProximityBalanced {
    inner: BalancedKdTree,
}

#[wasm_bindgen]
impl ProximityBalanced {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ProximityBalanced {
        ProximityBalanced {
            inner: BalancedKdTree::new(),
        }
    }

    /// Builds the index, replacing any previous contents.
    ///
    /// # Arguments
    ///
    /// * `positions` - A flat array of coordinates `[x, y, z, x, y, z, ...]`.
    /// * `ids` - One identifier per point, index-aligned with `positions`.
    pub fn build(&mut self, positions: &[f64], ids: &[i32]) -> Result<(), JsValue> {
        let points = unflatten(positions, ids.len())?;
        self.inner.build(points, ids.to_vec());
        Ok(())
    }

    /// Tombstones the point with the given identifier. Returns `false` when
    /// the identifier is unknown or already deleted.
    pub fn delete(&mut self, id: i32) -> bool {
        self.inner.delete(id)
    }

    /// Identifier of the closest non-deleted point, or `-1` when none is
    /// left.
    pub fn nearest(&mut self, x: f64, y: f64, z: f64) -> i32 {
        self.inner.nearest([x, y, z])
    }

    #[wasm_bindgen(getter)]
    pub fn count_points(&self) -> usize {
        self.inner.len()
    }

    /// Fills the index with `count` uniformly random points inside the cube
    /// `[min, max]^3`, using identifiers `0..count`.
    pub fn random_points(&mut self, count: usize, min: f64, max: f64) {
        let mut rng = StdRng::seed_from_u64(get_seed());
        let size = max - min;
        let positions = (0..count)
            .map(|_| {
                [
                    min + rng.r#gen::<f64>() * size,
                    min + rng.r#gen::<f64>() * size,
                    min + rng.r#gen::<f64>() * size,
                ]
            })
            .collect();
        let ids = (0..count as i32).collect();
        self.inner.build(positions, ids);
    }
}

pub(crate) fn unflatten(positions: &[f64], count: usize) -> Result<Vec<[f64; 3]>, JsValue> {
    if positions.len() % 3 != 0 {
        return Err(JsValue::from_str(
            "positions must be a flat [x, y, z, ...] array",
        ));
    }
    if positions.len() / 3 != count {
        return Err(JsValue::from_str("ids must have one entry per point"));
    }
    Ok(positions.chunks(3).map(|c| [c[0], c[1], c[2]]).collect())
}

pub(crate) fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789 // Fixed seed for tests
    }
}
