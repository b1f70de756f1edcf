// Helper functions for UTF-16 string operations
pub fn utf8_to_utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

pub fn utf16_to_utf8(v: &[u16]) -> String {
    String::from_utf16_lossy(v)
}

/// Decode UTF-16 into code points, keeping lone surrogates as their raw
/// value so patterns containing them can still be compiled.
pub fn utf16_code_points(v: &[u16]) -> impl Iterator<Item = u32> + Clone + '_ {
    std::char::decode_utf16(v.iter().cloned()).map(|r| match r {
        Ok(c) => c as u32,
        Err(e) => e.unpaired_surrogate() as u32,
    })
}
