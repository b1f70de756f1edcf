use crate::core::{Gc, GcPtr, JSArrayBuffer, JSTypedArray, MutationContext, TypedArrayKind, Value, new_gc_cell_ptr};
use crate::error::JSError;
use crate::{raise_range_error, raise_type_error};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

impl TypedArrayKind {
    pub const ALL: [TypedArrayKind; 11] = [
        TypedArrayKind::Int8,
        TypedArrayKind::Uint8,
        TypedArrayKind::Uint8Clamped,
        TypedArrayKind::Int16,
        TypedArrayKind::Uint16,
        TypedArrayKind::Int32,
        TypedArrayKind::Uint32,
        TypedArrayKind::Float32,
        TypedArrayKind::Float64,
        TypedArrayKind::BigInt64,
        TypedArrayKind::BigUint64,
    ];

    /// Global name of the view's constructor, e.g. `Uint8Array`.
    pub fn constructor_name(&self) -> &'static str {
        match self {
            TypedArrayKind::Int8 => "Int8Array",
            TypedArrayKind::Uint8 => "Uint8Array",
            TypedArrayKind::Uint8Clamped => "Uint8ClampedArray",
            TypedArrayKind::Int16 => "Int16Array",
            TypedArrayKind::Uint16 => "Uint16Array",
            TypedArrayKind::Int32 => "Int32Array",
            TypedArrayKind::Uint32 => "Uint32Array",
            TypedArrayKind::Float32 => "Float32Array",
            TypedArrayKind::Float64 => "Float64Array",
            TypedArrayKind::BigInt64 => "BigInt64Array",
            TypedArrayKind::BigUint64 => "BigUint64Array",
        }
    }

    pub fn element_size(&self) -> usize {
        match self {
            TypedArrayKind::Int8 | TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => 1,
            TypedArrayKind::Int16 | TypedArrayKind::Uint16 => 2,
            TypedArrayKind::Int32 | TypedArrayKind::Uint32 | TypedArrayKind::Float32 => 4,
            TypedArrayKind::Float64 | TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64 => 8,
        }
    }

    pub fn is_bigint(&self) -> bool {
        matches!(self, TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64)
    }
}

/// `new ArrayBuffer(len)` filled with `bytes`.
pub fn create_array_buffer<'gc>(mc: &MutationContext<'gc>, bytes: Vec<u8>) -> GcPtr<'gc, JSArrayBuffer> {
    new_gc_cell_ptr(mc, JSArrayBuffer { data: bytes })
}

/// `new <Kind>Array(buffer, byteOffset, length)`
pub fn create_typed_array<'gc>(
    mc: &MutationContext<'gc>,
    kind: TypedArrayKind,
    buffer: GcPtr<'gc, JSArrayBuffer>,
    byte_offset: usize,
    length: usize,
) -> Result<Gc<'gc, JSTypedArray<'gc>>, JSError> {
    let size = kind.element_size();
    if byte_offset % size != 0 {
        return Err(raise_range_error!(format!("start offset of {:?}Array should be a multiple of {}", kind, size)));
    }
    let buffer_len = buffer.borrow().data.len();
    let end = length.checked_mul(size).and_then(|bytes| bytes.checked_add(byte_offset));
    if end.is_none_or(|end| end > buffer_len) {
        return Err(raise_range_error!(format!("Invalid typed array length: {}", length)));
    }
    Ok(Gc::new(
        mc,
        JSTypedArray {
            kind,
            buffer,
            byte_offset,
            length,
        },
    ))
}

/// `ta[index]`, little-endian.
pub fn typed_array_get<'gc>(ta: &JSTypedArray<'gc>, index: usize) -> Option<Value<'gc>> {
    if index >= ta.length {
        return None;
    }
    let size = ta.kind.element_size();
    let start = ta.byte_offset + index * size;
    let data = ta.buffer.borrow();
    let bytes = data.data.get(start..start + size)?;
    let mut raw = [0u8; 8];
    raw[..size].copy_from_slice(bytes);

    let value = match ta.kind {
        TypedArrayKind::Int8 => Value::Number(raw[0] as i8 as f64),
        TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => Value::Number(raw[0] as f64),
        TypedArrayKind::Int16 => Value::Number(i16::from_le_bytes([raw[0], raw[1]]) as f64),
        TypedArrayKind::Uint16 => Value::Number(u16::from_le_bytes([raw[0], raw[1]]) as f64),
        TypedArrayKind::Int32 => Value::Number(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64),
        TypedArrayKind::Uint32 => Value::Number(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64),
        TypedArrayKind::Float32 => Value::Number(f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64),
        TypedArrayKind::Float64 => Value::Number(f64::from_le_bytes(raw)),
        TypedArrayKind::BigInt64 => Value::BigInt(BigInt::from(i64::from_le_bytes(raw))),
        TypedArrayKind::BigUint64 => Value::BigInt(BigInt::from(u64::from_le_bytes(raw))),
    };
    Some(value)
}

/// `ta[index] = value`. Out-of-range writes are ignored, as in JavaScript.
pub fn typed_array_set<'gc>(mc: &MutationContext<'gc>, ta: &JSTypedArray<'gc>, index: usize, value: &Value<'gc>) -> Result<(), JSError> {
    if index >= ta.length {
        return Ok(());
    }
    let bytes: Vec<u8> = match (ta.kind, value) {
        (TypedArrayKind::BigInt64, Value::BigInt(b)) => wrap_bigint(b).to_le_bytes().to_vec(),
        (TypedArrayKind::BigUint64, Value::BigInt(b)) => (wrap_bigint(b) as u64).to_le_bytes().to_vec(),
        (kind, Value::BigInt(_)) => return Err(raise_type_error!(format!("Cannot convert a BigInt value to a number in {:?}Array", kind))),
        (kind, _) if kind.is_bigint() => return Err(raise_type_error!(format!("Cannot convert {:?} to a BigInt", value))),
        (kind, v) => {
            let n = v.as_number().unwrap_or(f64::NAN);
            let int = if n.is_finite() { n.trunc() as i64 } else { 0 };
            match kind {
                TypedArrayKind::Int8 | TypedArrayKind::Uint8 => vec![int as u8],
                TypedArrayKind::Uint8Clamped => vec![if n.is_nan() { 0 } else { n.round().clamp(0.0, 255.0) as u8 }],
                TypedArrayKind::Int16 | TypedArrayKind::Uint16 => (int as u16).to_le_bytes().to_vec(),
                TypedArrayKind::Int32 | TypedArrayKind::Uint32 => (int as u32).to_le_bytes().to_vec(),
                TypedArrayKind::Float32 => (n as f32).to_le_bytes().to_vec(),
                TypedArrayKind::Float64 => n.to_le_bytes().to_vec(),
                TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64 => unreachable!(),
            }
        }
    };
    let start = ta.byte_offset + index * ta.kind.element_size();
    let mut data = ta.buffer.borrow_mut(mc);
    data.data[start..start + bytes.len()].copy_from_slice(&bytes);
    Ok(())
}

// Reduce modulo 2^64, keeping the low 64 bits as i64.
fn wrap_bigint(b: &BigInt) -> i64 {
    if let Some(v) = b.to_i64() {
        return v;
    }
    let modulus = BigInt::from(1u128 << 64);
    let mut r = b % &modulus;
    if r < BigInt::from(0) {
        r += &modulus;
    }
    r.to_u64().map(|v| v as i64).unwrap_or(0)
}
