//! On-disk layout of a chunk file.
//!
//! All integers are little-endian.
//!
//! ```text
//! header  (16 bytes)  cx: i32, cz: i32, size: i32, count: i32
//! body    (count × 14 bytes, in chunk index order)
//!         flags: u8     bit 0 = slot holds a voxel, bit 1 = voxel has face textures
//!         material: u8
//!         faces: [u16; 6]
//! ```
//!
//! `count` must equal `size³`. Air slots are written as all-zero records.

use bytemuck::{Pod, Zeroable};

use crate::voxels::block::Voxel;
use crate::voxels::chunk::{ChunkCoord, ChunkSnapshot};

pub const HEADER_LEN: usize = std::mem::size_of::<ChunkHeader>();
pub const RECORD_LEN: usize = std::mem::size_of::<VoxelRecord>();

const FLAG_PRESENT: u8 = 0b01;
const FLAG_TEXTURED: u8 = 0b10;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct ChunkHeader {
    pub cx: i32,
    pub cz: i32,
    pub size: i32,
    pub count: i32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct VoxelRecord {
    pub flags: u8,
    pub material: u8,
    pub faces: [u16; 6],
}

impl ChunkHeader {
    fn to_le(self) -> Self {
        ChunkHeader {
            cx: self.cx.to_le(),
            cz: self.cz.to_le(),
            size: self.size.to_le(),
            count: self.count.to_le(),
        }
    }

    fn from_le(self) -> Self {
        ChunkHeader {
            cx: i32::from_le(self.cx),
            cz: i32::from_le(self.cz),
            size: i32::from_le(self.size),
            count: i32::from_le(self.count),
        }
    }
}

impl VoxelRecord {
    fn encode(voxel: Option<Voxel>) -> Self {
        match voxel {
            None => VoxelRecord::zeroed(),
            Some(voxel) => VoxelRecord {
                flags: FLAG_PRESENT | if voxel.faces.is_some() { FLAG_TEXTURED } else { 0 },
                material: voxel.material,
                faces: voxel.faces.unwrap_or([0; 6]).map(u16::to_le),
            },
        }
    }

    fn decode(self, index: usize) -> Result<Option<Voxel>, String> {
        if self.flags & !(FLAG_PRESENT | FLAG_TEXTURED) != 0 {
            return Err(format!(
                "unknown flag bits {:#04x} in record {}",
                self.flags, index
            ));
        }
        match (self.flags & FLAG_PRESENT != 0, self.flags & FLAG_TEXTURED != 0) {
            (false, false) => Ok(None),
            (false, true) => Err(format!("record {} has textures but no voxel", index)),
            (true, false) => Ok(Some(Voxel::new(self.material))),
            (true, true) => Ok(Some(Voxel::textured(
                self.material,
                self.faces.map(u16::from_le),
            ))),
        }
    }
}

/// Serializes a snapshot into the chunk file layout.
pub fn encode(snapshot: &ChunkSnapshot) -> Vec<u8> {
    let header = ChunkHeader {
        cx: snapshot.position.x,
        cz: snapshot.position.z,
        size: snapshot.size as i32,
        count: snapshot.voxels.len() as i32,
    }
    .to_le();

    let mut bytes = Vec::with_capacity(HEADER_LEN + snapshot.voxels.len() * RECORD_LEN);
    bytes.extend_from_slice(bytemuck::bytes_of(&header));
    for &voxel in &snapshot.voxels {
        bytes.extend_from_slice(bytemuck::bytes_of(&VoxelRecord::encode(voxel)));
    }
    bytes
}

/// Parses a chunk file, checking it against the chunk that was asked for.
///
/// # Returns
/// The voxel array in chunk index order, or a description of the first problem found.
pub fn decode(
    bytes: &[u8],
    coord: ChunkCoord,
    expected_size: usize,
) -> Result<Vec<Option<Voxel>>, String> {
    if bytes.len() < HEADER_LEN {
        return Err(format!(
            "file is {} bytes, shorter than the {}-byte header",
            bytes.len(),
            HEADER_LEN
        ));
    }
    let header = bytemuck::pod_read_unaligned::<ChunkHeader>(&bytes[..HEADER_LEN]).from_le();

    if header.cx != coord.x || header.cz != coord.z {
        return Err(format!(
            "file holds chunk ({}, {}), expected {}",
            header.cx, header.cz, coord
        ));
    }
    if header.size as i64 != expected_size as i64 {
        return Err(format!(
            "chunk size is {}, expected {}",
            header.size, expected_size
        ));
    }
    let volume = expected_size * expected_size * expected_size;
    if header.count as i64 != volume as i64 {
        return Err(format!(
            "voxel count is {}, expected {}",
            header.count, volume
        ));
    }
    let body = &bytes[HEADER_LEN..];
    if body.len() != volume * RECORD_LEN {
        return Err(format!(
            "body is {} bytes, expected {}",
            body.len(),
            volume * RECORD_LEN
        ));
    }

    body.chunks_exact(RECORD_LEN)
        .enumerate()
        .map(|(index, raw)| bytemuck::pod_read_unaligned::<VoxelRecord>(raw).decode(index))
        .collect()
}
