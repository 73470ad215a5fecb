//! Field kinds and typed field values.

use serde::{Deserialize, Serialize};

/// The value kind of a field, as seen by the editable representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Integer,
    Boolean,
    Float,
    String,
    Color,
    ObjectReference,
    BitMask,
    Vector2,
    Vector3,
    Vector4,
    Rect,
    ArraySize,
    Character,
    Curve,
    Bounds,
    Quaternion,
    Enum,
    Gradient,
    ManagedReference,
    Generic,
}

impl FieldKind {
    /// Kinds that bulk editing knows how to copy between instances.
    pub const COPYABLE: [FieldKind; 16] = [
        FieldKind::Integer,
        FieldKind::Boolean,
        FieldKind::Float,
        FieldKind::String,
        FieldKind::Color,
        FieldKind::ObjectReference,
        FieldKind::BitMask,
        FieldKind::Vector2,
        FieldKind::Vector3,
        FieldKind::Vector4,
        FieldKind::Rect,
        FieldKind::ArraySize,
        FieldKind::Character,
        FieldKind::Curve,
        FieldKind::Bounds,
        FieldKind::Quaternion,
    ];

    pub fn is_copyable(&self) -> bool {
        Self::COPYABLE.contains(self)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FieldKind::Integer => "Integer",
            FieldKind::Boolean => "Boolean",
            FieldKind::Float => "Float",
            FieldKind::String => "String",
            FieldKind::Color => "Color",
            FieldKind::ObjectReference => "Object Reference",
            FieldKind::BitMask => "Bit Mask",
            FieldKind::Vector2 => "Vector2",
            FieldKind::Vector3 => "Vector3",
            FieldKind::Vector4 => "Vector4",
            FieldKind::Rect => "Rect",
            FieldKind::ArraySize => "Array Size",
            FieldKind::Character => "Character",
            FieldKind::Curve => "Curve",
            FieldKind::Bounds => "Bounds",
            FieldKind::Quaternion => "Quaternion",
            FieldKind::Enum => "Enum",
            FieldKind::Gradient => "Gradient",
            FieldKind::ManagedReference => "Managed Reference",
            FieldKind::Generic => "Generic",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Stable identifier of the asset an object-reference field points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef(pub String);

impl ObjectRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub center: [f32; 3],
    pub extents: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    pub in_tangent: f32,
    pub out_tangent: f32,
}

/// Keyframed animation curve
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Curve {
    pub keys: Vec<Keyframe>,
}

impl Curve {
    pub fn linear(start: f32, end: f32) -> Self {
        Self {
            keys: vec![
                Keyframe { time: 0.0, value: start, in_tangent: 0.0, out_tangent: end - start },
                Keyframe { time: 1.0, value: end, in_tangent: end - start, out_tangent: 0.0 },
            ],
        }
    }
}

/// A live field value.
///
/// `Enum` and `Opaque` exist so records can describe fields that bulk editing
/// refuses to copy; everything else maps one-to-one onto a copyable [`FieldKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Integer(i64),
    Boolean(bool),
    Float(f64),
    String(String),
    Color([f32; 4]),
    ObjectReference(Option<ObjectRef>),
    BitMask(u32),
    Vector2([f32; 2]),
    Vector3([f32; 3]),
    Vector4([f32; 4]),
    Rect(Rect),
    ArraySize(usize),
    Character(char),
    Curve(Curve),
    Bounds(Bounds),
    Quaternion([f32; 4]),
    Enum(i64),
    Opaque(FieldKind, String),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Color(_) => FieldKind::Color,
            FieldValue::ObjectReference(_) => FieldKind::ObjectReference,
            FieldValue::BitMask(_) => FieldKind::BitMask,
            FieldValue::Vector2(_) => FieldKind::Vector2,
            FieldValue::Vector3(_) => FieldKind::Vector3,
            FieldValue::Vector4(_) => FieldKind::Vector4,
            FieldValue::Rect(_) => FieldKind::Rect,
            FieldValue::ArraySize(_) => FieldKind::ArraySize,
            FieldValue::Character(_) => FieldKind::Character,
            FieldValue::Curve(_) => FieldKind::Curve,
            FieldValue::Bounds(_) => FieldKind::Bounds,
            FieldValue::Quaternion(_) => FieldKind::Quaternion,
            FieldValue::Enum(_) => FieldKind::Enum,
            FieldValue::Opaque(kind, _) => *kind,
        }
    }

    /// The referenced asset, if this is a populated object-reference value.
    pub fn object_ref(&self) -> Option<&ObjectRef> {
        match self {
            FieldValue::ObjectReference(Some(r)) => Some(r),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<char> for FieldValue {
    fn from(v: char) -> Self {
        FieldValue::Character(v)
    }
}
