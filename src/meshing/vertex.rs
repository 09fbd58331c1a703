//! Vertex data structures and layouts for voxel meshes.
//!
//! This module defines the vertex format produced by the mesher and a plain
//! description of its byte layout, so a renderer can set up its vertex
//! pipeline without this crate knowing anything about the GPU API.

/// Texture index used by faces that are drawn with their flat palette color.
pub const NO_TEXTURE: u32 = u32::MAX;

/// A vertex of a chunk mesh.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Normal: 3x f32 (12 bytes)
/// - Color: 4x f32 RGBA (16 bytes)
/// - Texture Coordinates: 2x f32 (8 bytes)
/// - Texture Index: u32 (4 bytes)
///
/// Total size: 52 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in chunk-local space
    pub position: [f32; 3],
    /// Unit normal of the face the vertex belongs to
    pub normal: [f32; 3],
    /// Palette color, shaded by the light reaching the face
    pub color: [f32; 4],
    /// Texture coordinates, tiled once per voxel across merged faces
    pub tex_coords: [f32; 2],
    /// Index of the face texture, or `NO_TEXTURE`
    pub texture_index: u32,
}

/// Component type of a vertex attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttributeFormat {
    Float32x2,
    Float32x3,
    Float32x4,
    Uint32,
}

/// One attribute of the vertex layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub offset: usize,
    pub shader_location: u32,
    pub format: AttributeFormat,
}

impl Vertex {
    /// Distance in bytes between consecutive vertices.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    /// The attribute layout, in shader location order.
    ///
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: normal (vec3<f32>)
    /// - `location = 2`: color (vec4<f32>)
    /// - `location = 3`: tex_coords (vec2<f32>)
    /// - `location = 4`: texture_index (u32)
    pub const ATTRIBUTES: [VertexAttribute; 5] = [
        VertexAttribute {
            name: "position",
            offset: 0,
            shader_location: 0,
            format: AttributeFormat::Float32x3,
        },
        VertexAttribute {
            name: "normal",
            offset: std::mem::size_of::<[f32; 3]>(),
            shader_location: 1,
            format: AttributeFormat::Float32x3,
        },
        VertexAttribute {
            name: "color",
            offset: std::mem::size_of::<[f32; 6]>(),
            shader_location: 2,
            format: AttributeFormat::Float32x4,
        },
        VertexAttribute {
            name: "tex_coords",
            offset: std::mem::size_of::<[f32; 10]>(),
            shader_location: 3,
            format: AttributeFormat::Float32x2,
        },
        VertexAttribute {
            name: "texture_index",
            offset: std::mem::size_of::<[f32; 12]>(),
            shader_location: 4,
            format: AttributeFormat::Uint32,
        },
    ];
}
