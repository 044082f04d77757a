use std::cell::Cell;
use std::rc::Rc;

use bytemuck::Zeroable;
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::backend::{GlBackend, ShaderStage};

use super::error::{ProgramError, ShaderStep, UniformError};
use super::uniform::{MatrixOrder, Uniform, UniformCell, UniformKind, UniformTable};

/// Linked vertex + fragment program with its uniform slot table.
///
/// Dropping the program deletes the GL program object.
pub struct Program<B: GlBackend> {
    backend: Rc<B>,
    id: B::Program,
    uniforms: UniformTable<B::UniformLocation>,
}

impl<B: GlBackend> Program<B> {
    /// Compiles both stages and links them.
    ///
    /// Stops at the first failing step; the fragment stage is not touched when
    /// the vertex stage fails. Every object created along the way is deleted
    /// on failure, and both shader objects are deleted after a successful link.
    pub fn compile(
        backend: Rc<B>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ProgramError> {
        let vs = compile_stage(&*backend, ShaderStage::Vertex, vertex_source)?;
        let fs = match compile_stage(&*backend, ShaderStage::Fragment, fragment_source) {
            Ok(fs) => fs,
            Err(err) => {
                backend.delete_shader(vs);
                return Err(err);
            }
        };

        let linked = link(&*backend, vs, fs);
        backend.delete_shader(vs);
        backend.delete_shader(fs);
        let id = linked?;

        log::debug!("program {id:?} linked");
        Ok(Self {
            backend,
            id,
            uniforms: UniformTable::default(),
        })
    }

    pub fn bind_vec1i(&mut self, name: &str) -> Result<Uniform<i32>, UniformError> {
        self.bind(name, UniformCell::Vec1i)
    }

    pub fn bind_vec1f(&mut self, name: &str) -> Result<Uniform<f32>, UniformError> {
        self.bind(name, UniformCell::Vec1f)
    }

    pub fn bind_vec2f(&mut self, name: &str) -> Result<Uniform<Vec2>, UniformError> {
        self.bind(name, UniformCell::Vec2f)
    }

    pub fn bind_vec3f(&mut self, name: &str) -> Result<Uniform<Vec3>, UniformError> {
        self.bind(name, UniformCell::Vec3f)
    }

    pub fn bind_vec4f(&mut self, name: &str) -> Result<Uniform<Vec4>, UniformError> {
        self.bind(name, UniformCell::Vec4f)
    }

    /// Binds a 4x4 matrix pushed in `order` on every activation.
    pub fn bind_mat4f(
        &mut self,
        name: &str,
        order: MatrixOrder,
    ) -> Result<Uniform<Mat4>, UniformError> {
        self.bind(name, |cell| UniformCell::Mat4f(cell, order))
    }

    fn bind<T>(
        &mut self,
        name: &str,
        wrap: impl FnOnce(Rc<Cell<T>>) -> UniformCell,
    ) -> Result<Uniform<T>, UniformError>
    where
        T: Copy + Zeroable,
    {
        let backend = &self.backend;
        let id = self.id;
        let bound = self
            .uniforms
            .bind(name, |n| backend.uniform_location(id, n), wrap);

        match &bound {
            Ok(_) => log::debug!("program {id:?}: bound uniform `{name}`"),
            Err(err) => log::debug!("program {id:?}: {err}"),
        }
        bound
    }

    /// Makes the program current and pushes the value of every bound uniform.
    ///
    /// No dirty tracking: every slot is pushed on every call.
    pub fn activate(&self) {
        self.backend.use_program(self.id);
        for (location, value) in self.uniforms.values() {
            self.backend.push_uniform(location, value);
        }
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.uniforms.kind_of(name).is_some()
    }

    pub fn bound_kind(&self, name: &str) -> Option<UniformKind> {
        self.uniforms.kind_of(name)
    }

    pub fn uniform_count(&self) -> usize {
        self.uniforms.len()
    }

    pub fn id(&self) -> B::Program {
        self.id
    }

    pub fn backend(&self) -> &Rc<B> {
        &self.backend
    }
}

impl<B: GlBackend> Drop for Program<B> {
    fn drop(&mut self) {
        self.backend.delete_program(self.id);
    }
}

impl<B: GlBackend> std::fmt::Debug for Program<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("id", &self.id)
            .field("uniforms", &self.uniforms.len())
            .finish()
    }
}

fn compile_stage<B: GlBackend>(
    backend: &B,
    stage: ShaderStage,
    source: &str,
) -> Result<B::Shader, ProgramError> {
    let step = match stage {
        ShaderStage::Vertex => ShaderStep::VertexCompile,
        ShaderStage::Fragment => ShaderStep::FragmentCompile,
    };

    let shader = backend
        .create_shader(stage)
        .map_err(|reason| ProgramError::new(step, reason))?;

    if backend.compile_shader(shader, source) {
        return Ok(shader);
    }

    let log = backend.shader_info_log(shader);
    backend.delete_shader(shader);
    log::warn!("{step} failed:\n{log}");
    Err(ProgramError::new(step, log))
}

fn link<B: GlBackend>(
    backend: &B,
    vs: B::Shader,
    fs: B::Shader,
) -> Result<B::Program, ProgramError> {
    let program = backend
        .create_program()
        .map_err(|reason| ProgramError::new(ShaderStep::ProgramLink, reason))?;

    backend.attach_shader(program, vs);
    backend.attach_shader(program, fs);
    if backend.link_program(program) {
        return Ok(program);
    }

    let log = backend.program_info_log(program);
    backend.delete_program(program);
    log::warn!("program link failed:\n{log}");
    Err(ProgramError::new(ShaderStep::ProgramLink, log))
}
