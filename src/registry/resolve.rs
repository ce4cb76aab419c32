// Alias resolution, struct layout and signature checks over a merged set.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::{
    BitRange, Decl, FieldKind, FieldLayout, InterfaceDescription, Merged, NativeType, OutSlot,
    PointerWidth, ResolvedFunction, ResolvedParam, StructLayout,
};
use crate::decl::{
    Convention, Direction, ErrorSource, Field, FunctionDescriptor, Repr, StructDescriptor,
};
use crate::error::{AssemblyError, UnresolvedAliasError};

/// What a type name denotes once aliases are followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Void,
    Scalar(NativeType),
    /// A pointer; `Some` when the pointee is named and therefore sized.
    Pointer(Option<&'static str>),
    StructPointer(&'static str),
    Struct(&'static str),
}

fn unresolved(name: &str, used_by: &str) -> AssemblyError {
    UnresolvedAliasError {
        name: name.to_owned(),
        used_by: used_by.to_owned(),
    }
    .into()
}

fn invalid(name: &str, reason: impl Into<String>) -> AssemblyError {
    AssemblyError::InvalidDeclaration {
        name: name.to_owned(),
        reason: reason.into(),
    }
}

const fn align_up(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}

pub(super) struct Resolver<'a> {
    merged: &'a Merged,
    width: PointerWidth,
    layouts: HashMap<&'static str, Arc<StructLayout>>,
    /// Struct tags whose layout is being computed, for by-value recursion.
    in_progress: Vec<&'static str>,
}

impl<'a> Resolver<'a> {
    pub(super) fn new(merged: &'a Merged, width: PointerWidth) -> Self {
        Self {
            merged,
            width,
            layouts: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    pub(super) fn resolve(mut self) -> Result<InterfaceDescription, AssemblyError> {
        let merged = self.merged;

        let mut types = BTreeMap::new();
        for alias in &merged.types {
            let ty = match self.shape(alias.name, alias.name)? {
                Shape::Void => NativeType::Void,
                Shape::Scalar(ty) => ty,
                Shape::Pointer(_) | Shape::StructPointer(_) => NativeType::Pointer,
                Shape::Struct(tag) => {
                    // A plain alias of a struct: only its layout is meaningful.
                    self.layout(tag, alias.name)?;
                    continue;
                }
            };
            types.insert(alias.name, ty);
        }

        let mut structs = BTreeMap::new();
        let mut struct_names = BTreeMap::new();
        for desc in &merged.structs {
            structs.insert(desc.tag, self.layout(desc.tag, desc.tag)?);
            for name in desc.names {
                struct_names.insert(name.name, (desc.tag, name.pointer));
            }
        }

        let mut functions = BTreeMap::new();
        for function in &merged.functions {
            functions.insert(function.name, self.function(function)?);
        }

        let constants = merged.constants.iter().copied().collect();

        Ok(InterfaceDescription {
            pointer_width: self.width,
            types,
            structs,
            struct_names,
            functions,
            constants,
        })
    }

    // ── Aliases ───────────────────────────────────────────────────────────────

    fn shape(&self, name: &'static str, used_by: &str) -> Result<Shape, AssemblyError> {
        let mut visiting = Vec::new();
        self.follow(name, used_by, &mut visiting)
    }

    fn follow(
        &self,
        name: &'static str,
        used_by: &str,
        visiting: &mut Vec<&'static str>,
    ) -> Result<Shape, AssemblyError> {
        if visiting.contains(&name) {
            // Alias cycle: no name in it ever reaches a native type.
            return Err(unresolved(name, used_by));
        }
        visiting.push(name);

        let shape = match self.merged.names.get(name) {
            Some((Decl::Type(alias), _)) => match alias.repr {
                Repr::Void => Shape::Void,
                Repr::Int { bits, signed } => {
                    if !matches!(bits, 8 | 16 | 32 | 64) {
                        return Err(invalid(name, format!("unsupported integer width {bits}")));
                    }
                    Shape::Scalar(NativeType::Int { bits, signed })
                }
                Repr::PointerWidth { signed } => Shape::Scalar(NativeType::Int {
                    bits: self.width.bits(),
                    signed,
                }),
                Repr::Pointer => Shape::Pointer(None),
                Repr::PointerTo(pointee) => {
                    // Only existence is checked here; the pointee is resolved
                    // on its own and when an out-parameter is sized.
                    match self.merged.names.get(pointee) {
                        Some((Decl::Type(_) | Decl::Struct(_) | Decl::StructName { .. }, _)) => {}
                        _ => return Err(unresolved(pointee, name)),
                    }
                    Shape::Pointer(Some(pointee))
                }
                Repr::Alias(target) => self.follow(target, used_by, visiting)?,
            },
            Some((Decl::StructName { tag, pointer: true }, _)) => Shape::StructPointer(*tag),
            Some((Decl::StructName { tag, pointer: false }, _)) => Shape::Struct(*tag),
            Some((Decl::Struct(desc), _)) => Shape::Struct(desc.tag),
            Some((Decl::Function(_) | Decl::Constant(_), _)) | None => {
                return Err(unresolved(name, used_by));
            }
        };

        visiting.pop();
        Ok(shape)
    }

    // ── Struct layout ─────────────────────────────────────────────────────────

    fn layout(
        &mut self,
        tag: &'static str,
        used_by: &str,
    ) -> Result<Arc<StructLayout>, AssemblyError> {
        if let Some(layout) = self.layouts.get(tag) {
            return Ok(Arc::clone(layout));
        }
        if self.in_progress.contains(&tag) {
            return Err(invalid(tag, "struct contains itself by value"));
        }
        let merged = self.merged;
        let Some((Decl::Struct(desc), _)) = merged.names.get(tag) else {
            return Err(unresolved(tag, used_by));
        };

        self.in_progress.push(tag);
        let layout = Arc::new(self.compute_layout(desc)?);
        self.in_progress.pop();

        self.layouts.insert(tag, Arc::clone(&layout));
        Ok(layout)
    }

    fn compute_layout(&mut self, desc: &StructDescriptor) -> Result<StructLayout, AssemblyError> {
        let mut fields = Vec::with_capacity(desc.fields.len());
        let mut offset = 0usize;
        let mut align = 1usize;
        // (storage type, unit offset, bits used) of an open bit-field group.
        let mut group: Option<(NativeType, usize, u8)> = None;

        for field in desc.fields {
            let (kind, size, field_align) = self.field_storage(desc.tag, field)?;

            if let Some(bits) = field.bits {
                let NativeType::Int { bits: unit_bits, .. } = scalar_of(&kind) else {
                    return Err(invalid(
                        desc.tag,
                        format!("bit-field `{}` must have an integer type", field.name),
                    ));
                };
                if field.count.is_some() || bits == 0 || bits > unit_bits {
                    return Err(invalid(
                        desc.tag,
                        format!("bit-field `{}` has an invalid width {bits}", field.name),
                    ));
                }

                let (unit_ty, unit_offset, used) = match group {
                    Some((ty, at, used)) if ty == scalar_of(&kind) => (ty, at, used),
                    Some(_) => {
                        return Err(invalid(
                            desc.tag,
                            format!(
                                "bit-field `{}` changes the storage unit mid-group",
                                field.name
                            ),
                        ));
                    }
                    None => {
                        let at = align_up(offset, field_align);
                        align = align.max(field_align);
                        (scalar_of(&kind), at, 0)
                    }
                };
                if used + bits > unit_bits {
                    return Err(invalid(
                        desc.tag,
                        format!("bit-field `{}` overflows its {unit_bits}-bit unit", field.name),
                    ));
                }

                fields.push(FieldLayout {
                    name: field.name,
                    offset: unit_offset,
                    size,
                    count: 1,
                    kind,
                    bits: Some(BitRange::new(used, bits)),
                });

                if used + bits == unit_bits {
                    offset = unit_offset + size;
                    group = None;
                } else {
                    group = Some((unit_ty, unit_offset, used + bits));
                }
                continue;
            }

            if let Some((_, _, used)) = group {
                return Err(invalid(
                    desc.tag,
                    format!("bit-field group ends at `{}` with only {used} bits used", field.name),
                ));
            }

            let count = field.count.unwrap_or(1);
            if count == 0 {
                return Err(invalid(desc.tag, format!("array `{}` has no elements", field.name)));
            }
            let at = align_up(offset, field_align);
            fields.push(FieldLayout {
                name: field.name,
                offset: at,
                size,
                count,
                kind,
                bits: None,
            });
            offset = at + size * count;
            align = align.max(field_align);
        }

        if let Some((_, _, used)) = group {
            return Err(invalid(
                desc.tag,
                format!("trailing bit-field group uses only {used} bits of its unit"),
            ));
        }

        Ok(StructLayout {
            tag: desc.tag,
            size: align_up(offset, align),
            align,
            fields,
        })
    }

    /// Kind, element size and alignment of one member.
    fn field_storage(
        &mut self,
        tag: &'static str,
        field: &Field,
    ) -> Result<(FieldKind, usize, usize), AssemblyError> {
        match self.shape(field.ty, tag)? {
            Shape::Void => Err(invalid(tag, format!("field `{}` is VOID", field.name))),
            Shape::Scalar(ty) => {
                let bytes = usize::from(ty.bits(self.width) / 8);
                Ok((FieldKind::Scalar(ty), bytes, bytes))
            }
            Shape::Pointer(_) | Shape::StructPointer(_) => {
                let bytes = self.width.bytes();
                Ok((FieldKind::Scalar(NativeType::Pointer), bytes, bytes))
            }
            Shape::Struct(inner) => {
                let layout = self.layout(inner, tag)?;
                let (size, align) = (layout.size, layout.align);
                Ok((FieldKind::Struct(layout), size, align))
            }
        }
    }

    // ── Functions ─────────────────────────────────────────────────────────────

    fn function(&mut self, desc: &FunctionDescriptor) -> Result<ResolvedFunction, AssemblyError> {
        let ret = match self.shape(desc.ret, desc.name)? {
            Shape::Void => NativeType::Void,
            Shape::Scalar(ty) => ty,
            Shape::Pointer(_) | Shape::StructPointer(_) => NativeType::Pointer,
            Shape::Struct(_) => {
                return Err(invalid(desc.name, "structs cannot be returned by value"));
            }
        };
        if ret.bits(self.width) > self.width.bits() {
            return Err(invalid(desc.name, "return type is wider than a pointer"));
        }
        if ret == NativeType::Void && desc.convention != Convention::Infallible {
            return Err(invalid(
                desc.name,
                "a VOID return cannot carry a failure convention",
            ));
        }

        if let Convention::FailsOn(_, ErrorSource::Function(source)) = desc.convention {
            match self.merged.names.get(source) {
                Some((Decl::Function(f), _)) if f.params.is_empty() => {}
                Some((Decl::Function(_), _)) => {
                    return Err(invalid(
                        desc.name,
                        format!("error source `{source}` must take no arguments"),
                    ));
                }
                _ => return Err(unresolved(source, desc.name)),
            }
        }

        let mut params = Vec::with_capacity(desc.params.len());
        for param in desc.params {
            let shape = self.shape(param.ty, desc.name)?;
            let ty = match shape {
                Shape::Scalar(ty) => ty,
                Shape::Pointer(_) | Shape::StructPointer(_) => NativeType::Pointer,
                Shape::Void => {
                    return Err(invalid(
                        desc.name,
                        format!("parameter `{}` is VOID", param.name),
                    ));
                }
                Shape::Struct(_) => {
                    return Err(invalid(
                        desc.name,
                        format!("parameter `{}` passes a struct by value", param.name),
                    ));
                }
            };
            if ty.bits(self.width) > self.width.bits() {
                return Err(invalid(
                    desc.name,
                    format!("parameter `{}` is wider than a pointer", param.name),
                ));
            }

            let slot = match param.direction {
                Direction::In | Direction::Optional => None,
                Direction::Out | Direction::InOut => {
                    Some(self.out_slot(desc.name, param.name, param.direction, shape)?)
                }
            };
            params.push(ResolvedParam {
                param: *param,
                ty,
                slot,
            });
        }

        Ok(ResolvedFunction {
            descriptor: *desc,
            ret,
            params,
        })
    }

    fn out_slot(
        &mut self,
        function: &'static str,
        param: &'static str,
        direction: Direction,
        shape: Shape,
    ) -> Result<OutSlot, AssemblyError> {
        let slot = match shape {
            Shape::StructPointer(tag) => OutSlot::Struct(self.layout(tag, function)?),
            Shape::Pointer(Some(pointee)) => match self.shape(pointee, function)? {
                Shape::Scalar(ty) => OutSlot::Scalar(ty),
                Shape::Pointer(_) | Shape::StructPointer(_) => OutSlot::Scalar(NativeType::Pointer),
                Shape::Struct(tag) => OutSlot::Struct(self.layout(tag, function)?),
                Shape::Void => {
                    return Err(invalid(
                        function,
                        format!("out parameter `{param}` points at VOID"),
                    ));
                }
            },
            _ => {
                return Err(invalid(
                    function,
                    format!("out parameter `{param}` is not a pointer to a sized type"),
                ));
            }
        };
        if direction == Direction::InOut && matches!(slot, OutSlot::Struct(_)) {
            return Err(invalid(
                function,
                format!("in-out parameter `{param}` must point at a scalar"),
            ));
        }
        Ok(slot)
    }
}

fn scalar_of(kind: &FieldKind) -> NativeType {
    match kind {
        FieldKind::Scalar(ty) => *ty,
        FieldKind::Struct(_) => NativeType::Void,
    }
}
