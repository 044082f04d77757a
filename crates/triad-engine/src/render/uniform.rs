//! Uniform slots.
//!
//! A program owns one slot per bound uniform name. Each slot holds a shared,
//! zero-initialized cell; the caller keeps a [`Uniform`] handle to the same
//! cell and writes into it freely. Activation reads every cell and pushes the
//! current value, so there is no separate "set" call to the program.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use bytemuck::Zeroable;
use glam::{Mat4, Vec2, Vec3, Vec4};

use super::error::UniformError;

/// Value kind of a uniform slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformKind {
    Vec1i,
    Vec1f,
    Vec2f,
    Vec3f,
    Vec4f,
    Mat4f,
}

/// Element order used when a 4x4 matrix is pushed to the program.
///
/// The cell always holds a `glam::Mat4`, whose `to_cols_array` is pushed
/// as-is. `ColumnMajor` uploads it untransposed, so the GPU sees the same
/// matrix. `RowMajor` tells the driver to read that column array as row-major
/// storage, so the GPU receives the transpose of the cell's matrix.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum MatrixOrder {
    #[default]
    ColumnMajor,
    RowMajor,
}

impl MatrixOrder {
    /// The `transpose` flag handed to `glUniformMatrix4fv`.
    #[inline]
    pub const fn transposes(self) -> bool {
        matches!(self, Self::RowMajor)
    }
}

/// Snapshot of a slot's value, as handed to the backend.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Vec1i(i32),
    Vec1f(f32),
    Vec2f(Vec2),
    Vec3f(Vec3),
    Vec4f(Vec4),
    Mat4f(Mat4, MatrixOrder),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Vec1i(_) => UniformKind::Vec1i,
            UniformValue::Vec1f(_) => UniformKind::Vec1f,
            UniformValue::Vec2f(_) => UniformKind::Vec2f,
            UniformValue::Vec3f(_) => UniformKind::Vec3f,
            UniformValue::Vec4f(_) => UniformKind::Vec4f,
            UniformValue::Mat4f(..) => UniformKind::Mat4f,
        }
    }
}

/// Write-through handle to a bound uniform.
///
/// Clones share the same cell. Writes become visible to the GPU on the next
/// `Program::activate`.
#[derive(Debug, Clone)]
pub struct Uniform<T: Copy> {
    cell: Rc<Cell<T>>,
}

impl<T: Copy> Uniform<T> {
    #[inline]
    pub fn set(&self, value: T) {
        self.cell.set(value);
    }

    #[inline]
    pub fn get(&self) -> T {
        self.cell.get()
    }

    #[inline]
    pub fn update(&self, f: impl FnOnce(T) -> T) {
        self.cell.set(f(self.cell.get()));
    }
}

/// Typed cell owned by a slot.
#[derive(Debug)]
pub(crate) enum UniformCell {
    Vec1i(Rc<Cell<i32>>),
    Vec1f(Rc<Cell<f32>>),
    Vec2f(Rc<Cell<Vec2>>),
    Vec3f(Rc<Cell<Vec3>>),
    Vec4f(Rc<Cell<Vec4>>),
    Mat4f(Rc<Cell<Mat4>>, MatrixOrder),
}

impl UniformCell {
    fn value(&self) -> UniformValue {
        match self {
            UniformCell::Vec1i(c) => UniformValue::Vec1i(c.get()),
            UniformCell::Vec1f(c) => UniformValue::Vec1f(c.get()),
            UniformCell::Vec2f(c) => UniformValue::Vec2f(c.get()),
            UniformCell::Vec3f(c) => UniformValue::Vec3f(c.get()),
            UniformCell::Vec4f(c) => UniformValue::Vec4f(c.get()),
            UniformCell::Mat4f(c, order) => UniformValue::Mat4f(c.get(), *order),
        }
    }

    fn kind(&self) -> UniformKind {
        self.value().kind()
    }
}

#[derive(Debug)]
struct UniformSlot<L> {
    location: L,
    cell: UniformCell,
}

/// Name-keyed slot table. Grows monotonically; a name is bound at most once.
#[derive(Debug)]
pub(crate) struct UniformTable<L> {
    slots: Vec<UniformSlot<L>>,
    by_name: HashMap<String, usize>,
}

impl<L> Default for UniformTable<L> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<L> UniformTable<L> {
    /// Binds `name` to a fresh zeroed cell.
    ///
    /// The duplicate check runs before `locate`, so a rebind never reaches the driver.
    pub(crate) fn bind<T>(
        &mut self,
        name: &str,
        locate: impl FnOnce(&str) -> Option<L>,
        wrap: impl FnOnce(Rc<Cell<T>>) -> UniformCell,
    ) -> Result<Uniform<T>, UniformError>
    where
        T: Copy + Zeroable,
    {
        if let Some(kind) = self.kind_of(name) {
            return Err(UniformError::BoundAlready {
                name: name.to_owned(),
                kind,
            });
        }

        let location = locate(name).ok_or_else(|| UniformError::NotFound {
            name: name.to_owned(),
        })?;

        let shared = Rc::new(Cell::new(T::zeroed()));
        self.by_name.insert(name.to_owned(), self.slots.len());
        self.slots.push(UniformSlot {
            location,
            cell: wrap(Rc::clone(&shared)),
        });

        Ok(Uniform { cell: shared })
    }

    pub(crate) fn kind_of(&self, name: &str) -> Option<UniformKind> {
        self.by_name.get(name).map(|&i| self.slots[i].cell.kind())
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Current value of every slot, in bind order.
    pub(crate) fn values(&self) -> impl Iterator<Item = (&L, UniformValue)> + '_ {
        self.slots.iter().map(|s| (&s.location, s.cell.value()))
    }
}
