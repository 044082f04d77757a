use super::error::VertexBufferError;

/// Number of components in one vertex attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum ComponentCount {
    Vec1 = 1,
    Vec2 = 2,
    Vec3 = 3,
    Vec4 = 4,
}

impl ComponentCount {
    #[inline]
    pub const fn get(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for ComponentCount {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Vec1),
            2 => Ok(Self::Vec2),
            3 => Ok(Self::Vec3),
            4 => Ok(Self::Vec4),
            other => Err(other),
        }
    }
}

/// Scalar type of each component as stored in the vertex buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ComponentType {
    Float,
    Int,
    Uint,
}

impl ComponentType {
    /// Size in bytes of one component (`GLfloat`, `GLint`, `GLuint`).
    #[inline]
    pub const fn byte_width(self) -> usize {
        match self {
            ComponentType::Float => size_of::<f32>(),
            ComponentType::Int => size_of::<i32>(),
            ComponentType::Uint => size_of::<u32>(),
        }
    }
}

/// Shape of one vertex attribute inside an interleaved vertex record.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttributeDescriptor {
    pub count: ComponentCount,
    pub ty: ComponentType,
    /// Integer components are mapped to `[0, 1]` / `[-1, 1]` when converted to float.
    pub normalize: bool,
}

impl AttributeDescriptor {
    #[inline]
    pub const fn new(count: ComponentCount, ty: ComponentType, normalize: bool) -> Self {
        Self { count, ty, normalize }
    }

    /// Non-normalized float attribute, the common case for positions, colors and UVs.
    #[inline]
    pub const fn float(count: ComponentCount) -> Self {
        Self::new(count, ComponentType::Float, false)
    }

    #[inline]
    pub const fn byte_size(self) -> usize {
        self.count.get() * self.ty.byte_width()
    }
}

/// One attribute placed at its byte offset within the vertex record.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    /// Attribute slot; equal to the descriptor's position in the list.
    pub index: u32,
    pub offset: usize,
    pub descriptor: AttributeDescriptor,
}

/// Interleaved, tightly packed layout computed from an ordered descriptor list.
///
/// Invariant: `stride > 0` and `attributes` is non-empty.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VertexLayout {
    stride: usize,
    attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    pub fn from_descriptors(
        descriptors: &[AttributeDescriptor],
    ) -> Result<Self, VertexBufferError> {
        if descriptors.is_empty() {
            return Err(VertexBufferError::EmptyDescriptorArray);
        }

        let mut offset = 0;
        let attributes = descriptors
            .iter()
            .enumerate()
            .map(|(index, descriptor)| {
                let attribute = VertexAttribute {
                    index: index as u32,
                    offset,
                    descriptor: *descriptor,
                };
                offset += descriptor.byte_size();
                attribute
            })
            .collect();

        Ok(Self {
            stride: offset,
            attributes,
        })
    }

    /// Byte distance between two consecutive vertex records.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Number of whole vertices in a buffer of `byte_len` bytes.
    ///
    /// Fails when `byte_len` is not an exact multiple of the stride.
    pub fn vertex_count(&self, byte_len: usize) -> Result<usize, VertexBufferError> {
        if byte_len % self.stride != 0 {
            return Err(VertexBufferError::InvalidBufferSizeForDescriptors {
                buffer_size: byte_len,
                stride: self.stride,
            });
        }
        Ok(byte_len / self.stride)
    }
}
