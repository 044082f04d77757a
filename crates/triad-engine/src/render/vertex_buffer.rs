use std::rc::Rc;

use bytemuck::Pod;

use crate::backend::GlBackend;

use super::attribute::{AttributeDescriptor, VertexLayout};
use super::error::{ResourceError, VertexBufferError};

/// Advisory usage pattern passed to the driver with the buffer contents.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum UsageHint {
    #[default]
    StaticDraw,
    DynamicDraw,
    StreamDraw,
}

/// GPU vertex buffer paired with the vertex array describing its layout.
///
/// The pair lives and dies together; dropping deletes both objects.
pub struct VertexBuffer<B: GlBackend> {
    backend: Rc<B>,
    vertex_array: B::VertexArray,
    buffer: B::Buffer,
    layout: Option<VertexLayout>,
    vertex_count: usize,
}

impl<B: GlBackend> VertexBuffer<B> {
    /// Creates the buffer + vertex array pair and leaves both bound.
    pub fn new(backend: Rc<B>) -> Result<Self, ResourceError> {
        let vertex_array = backend
            .create_vertex_array()
            .map_err(|reason| ResourceError::new("vertex array", reason))?;

        let buffer = match backend.create_buffer() {
            Ok(buffer) => buffer,
            Err(reason) => {
                backend.delete_vertex_array(vertex_array);
                return Err(ResourceError::new("vertex buffer", reason));
            }
        };

        let vb = Self {
            backend,
            vertex_array,
            buffer,
            layout: None,
            vertex_count: 0,
        };
        vb.bind();
        Ok(vb)
    }

    /// Replaces the buffer contents and re-declares the attribute layout.
    ///
    /// `data` is interleaved vertex records laid out exactly as `descriptors`
    /// describe. Attribute `i` is declared at slot `i`; slots left over from a
    /// longer previous layout are disabled. Validation happens before any
    /// driver call, so a rejected upload leaves the previous contents untouched.
    pub fn upload(
        &mut self,
        data: &[u8],
        descriptors: &[AttributeDescriptor],
        hint: UsageHint,
    ) -> Result<(), VertexBufferError> {
        let layout = VertexLayout::from_descriptors(descriptors)?;
        let vertex_count = layout.vertex_count(data.len())?;

        self.bind();
        self.backend.array_buffer_data(data, hint);

        let stride = layout.stride() as i32;
        for attribute in layout.attributes() {
            self.backend.vertex_attrib_pointer(
                attribute.index,
                attribute.descriptor,
                stride,
                attribute.offset as i32,
            );
            self.backend.enable_vertex_attrib_array(attribute.index);
        }

        let declared = layout.attributes().len() as u32;
        let previous = self
            .layout
            .as_ref()
            .map_or(0, |old| old.attributes().len() as u32);
        for index in declared..previous {
            self.backend.disable_vertex_attrib_array(index);
        }

        log::debug!(
            "vertex buffer {:?}: uploaded {} bytes ({} vertices, stride {}, {:?})",
            self.buffer,
            data.len(),
            vertex_count,
            layout.stride(),
            hint
        );

        self.layout = Some(layout);
        self.vertex_count = vertex_count;
        Ok(())
    }

    /// [`upload`](Self::upload) for a typed slice of plain-old-data vertices or scalars.
    pub fn upload_slice<T: Pod>(
        &mut self,
        data: &[T],
        descriptors: &[AttributeDescriptor],
        hint: UsageHint,
    ) -> Result<(), VertexBufferError> {
        self.upload(bytemuck::cast_slice(data), descriptors, hint)
    }

    /// Rebinds the vertex array and buffer. Required before every draw.
    pub fn activate(&self) {
        self.bind();
    }

    /// Layout of the last successful upload.
    pub fn layout(&self) -> Option<&VertexLayout> {
        self.layout.as_ref()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn bind(&self) {
        self.backend.bind_vertex_array(self.vertex_array);
        self.backend.bind_array_buffer(self.buffer);
    }
}

impl<B: GlBackend> Drop for VertexBuffer<B> {
    fn drop(&mut self) {
        self.backend.delete_buffer(self.buffer);
        self.backend.delete_vertex_array(self.vertex_array);
    }
}

impl<B: GlBackend> std::fmt::Debug for VertexBuffer<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexBuffer")
            .field("vertex_array", &self.vertex_array)
            .field("buffer", &self.buffer)
            .field("vertex_count", &self.vertex_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{GlCall, RecordingBackend};
    use crate::render::{ComponentCount, ComponentType};

    fn vec3() -> AttributeDescriptor {
        AttributeDescriptor::float(ComponentCount::Vec3)
    }

    fn fresh() -> (Rc<RecordingBackend>, VertexBuffer<RecordingBackend>) {
        let backend = Rc::new(RecordingBackend::new());
        let vb = VertexBuffer::new(Rc::clone(&backend)).unwrap();
        backend.take_calls();
        (backend, vb)
    }

    #[test]
    fn creation_binds_the_pair() {
        let backend = Rc::new(RecordingBackend::new());
        let _vb = VertexBuffer::new(Rc::clone(&backend)).unwrap();
        assert_eq!(
            backend.calls(),
            vec![
                GlCall::CreateVertexArray(1),
                GlCall::CreateBuffer(2),
                GlCall::BindVertexArray(1),
                GlCall::BindArrayBuffer(2),
            ]
        );
    }

    #[test]
    fn triangle_upload_declares_interleaved_attributes() {
        let (backend, mut vb) = fresh();
        let vertices: [f32; 18] = [
            0.5, -0.5, 0.0, 1.0, 0.0, 0.0, //
            -0.5, -0.5, 0.0, 0.0, 1.0, 0.0, //
            0.0, 0.5, 0.0, 0.0, 0.0, 1.0,
        ];

        vb.upload_slice(&vertices, &[vec3(), vec3()], UsageHint::StaticDraw)
            .unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                GlCall::BindVertexArray(1),
                GlCall::BindArrayBuffer(2),
                GlCall::ArrayBufferData {
                    data: bytemuck::cast_slice(&vertices).to_vec(),
                    usage: UsageHint::StaticDraw,
                },
                GlCall::VertexAttribPointer { index: 0, attribute: vec3(), stride: 24, offset: 0 },
                GlCall::EnableVertexAttribArray(0),
                GlCall::VertexAttribPointer { index: 1, attribute: vec3(), stride: 24, offset: 12 },
                GlCall::EnableVertexAttribArray(1),
            ]
        );
        assert_eq!(vb.vertex_count(), 3);
        assert_eq!(vb.layout().map(VertexLayout::stride), Some(24));
    }

    #[test]
    fn misaligned_size_is_rejected_without_driver_calls() {
        let (backend, mut vb) = fresh();
        let err = vb
            .upload(&[0u8; 71], &[vec3(), vec3()], UsageHint::StaticDraw)
            .unwrap_err();

        assert_eq!(
            err,
            VertexBufferError::InvalidBufferSizeForDescriptors { buffer_size: 71, stride: 24 }
        );
        assert!(backend.calls().is_empty());
        assert!(vb.layout().is_none());
    }

    #[test]
    fn empty_descriptors_are_rejected_for_any_length() {
        let (backend, mut vb) = fresh();
        for len in [0usize, 3, 24] {
            let data = vec![0u8; len];
            assert_eq!(
                vb.upload(&data, &[], UsageHint::DynamicDraw),
                Err(VertexBufferError::EmptyDescriptorArray)
            );
        }
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn reupload_replaces_layout() {
        let (backend, mut vb) = fresh();
        vb.upload(&[0u8; 72], &[vec3(), vec3()], UsageHint::StaticDraw)
            .unwrap();

        let packed = AttributeDescriptor::new(ComponentCount::Vec4, ComponentType::Uint, true);
        vb.upload(&[0u8; 32], &[packed], UsageHint::StreamDraw).unwrap();

        assert_eq!(vb.vertex_count(), 2);
        assert_eq!(vb.layout().map(VertexLayout::stride), Some(16));
        let tail: Vec<_> = backend.calls().into_iter().rev().take(3).collect();
        assert_eq!(
            tail,
            vec![
                GlCall::DisableVertexAttribArray(1),
                GlCall::EnableVertexAttribArray(0),
                GlCall::VertexAttribPointer { index: 0, attribute: packed, stride: 16, offset: 0 },
            ]
        );
    }

    #[test]
    fn shorter_layout_disables_every_stale_slot() {
        let (backend, mut vb) = fresh();
        let vec2 = AttributeDescriptor::float(ComponentCount::Vec2);
        vb.upload(&[0u8; 32], &[vec3(), vec2, vec3()], UsageHint::StaticDraw)
            .unwrap();
        backend.take_calls();

        vb.upload(&[0u8; 12], &[vec3()], UsageHint::StaticDraw).unwrap();
        assert_eq!(
            backend.take_calls(),
            vec![
                GlCall::BindVertexArray(1),
                GlCall::BindArrayBuffer(2),
                GlCall::ArrayBufferData { data: vec![0u8; 12], usage: UsageHint::StaticDraw },
                GlCall::VertexAttribPointer { index: 0, attribute: vec3(), stride: 12, offset: 0 },
                GlCall::EnableVertexAttribArray(0),
                GlCall::DisableVertexAttribArray(1),
                GlCall::DisableVertexAttribArray(2),
            ]
        );

        // Growing again disables nothing.
        vb.upload(&[0u8; 24], &[vec3(), vec3()], UsageHint::StaticDraw)
            .unwrap();
        assert!(
            !backend
                .calls()
                .iter()
                .any(|c| matches!(c, GlCall::DisableVertexAttribArray(_)))
        );
    }

    #[test]
    fn activate_always_rebinds() {
        let (backend, vb) = fresh();
        vb.activate();
        vb.activate();
        assert_eq!(
            backend.calls(),
            vec![
                GlCall::BindVertexArray(1),
                GlCall::BindArrayBuffer(2),
                GlCall::BindVertexArray(1),
                GlCall::BindArrayBuffer(2),
            ]
        );
    }

    #[test]
    fn drop_deletes_buffer_and_vertex_array() {
        let (backend, vb) = fresh();
        drop(vb);
        assert_eq!(
            backend.calls(),
            vec![GlCall::DeleteBuffer(2), GlCall::DeleteVertexArray(1)]
        );
    }
}
