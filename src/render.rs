//! Render extraction
//!
//! Converts the body list into flat per-blob instances once per frame. The
//! renderer only ever sees these; it needs no physics knowledge to draw a
//! rounded, squashed, colored shape per blob.

use bytemuck::{Pod, Zeroable};

use crate::sim::{Body, World};

/// Smallest box side used for the corner radius
const MIN_BOX_SIDE: f32 = 16.0;
/// Corner radius as a share of the shorter box side
const CORNER_FACTOR: f32 = 0.18;

/// One blob as handed to the renderer (GPU-uploadable, 64 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BlobInstance {
    pub center: [f32; 2],
    /// Half width and half height after squash
    pub half_extents: [f32; 2],
    pub color: [f32; 4],
    pub deform: [f32; 2],
    pub corner_radius: f32,
    /// Radius including wobble
    pub effective_radius: f32,
    /// 1 if the blob touched another this tick
    pub collided: u32,
    _pad: [u32; 3],
}

impl BlobInstance {
    pub fn from_body(body: &Body) -> Self {
        let r = body.effective_radius();
        let (dx, dy) = (body.deform.x, body.deform.y);
        let rx = r * (1.0 + dx);
        let ry = r * (1.0 - 0.6 * dx + 0.4 * dy);
        let side = (2.0 * rx).min(2.0 * ry).max(MIN_BOX_SIDE);
        let [red, green, blue] = body.color.to_f32();

        Self {
            center: body.pos.to_array(),
            half_extents: [rx, ry],
            color: [red, green, blue, 1.0],
            deform: body.deform.to_array(),
            corner_radius: side * CORNER_FACTOR,
            effective_radius: r,
            collided: u32::from(body.collided),
            _pad: [0; 3],
        }
    }
}

/// Extract every blob in body order
pub fn extract_instances(world: &World) -> Vec<BlobInstance> {
    world.bodies.iter().map(BlobInstance::from_body).collect()
}

/// Raw bytes for uploading a batch of instances
pub fn as_bytes(instances: &[BlobInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
