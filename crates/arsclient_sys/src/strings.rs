//! Helpers for the vendor's fixed-size `char` arrays and C strings.

use std::ffi::CStr;
use std::os::raw::c_char;

/// Copies `src` into the fixed-size array `dst`, truncating at capacity and
/// always leaving the result NUL-terminated. Bytes after the terminator are
/// zeroed so the array has one canonical representation.
///
/// Truncation happens at a byte boundary; a multi-byte UTF-8 sequence cut in
/// half reads back lossily.
pub fn write_fixed(dst: &mut [c_char], src: &str) {
    let capacity = dst.len().saturating_sub(1);
    let bytes = src.as_bytes();
    let len = bytes.len().min(capacity);
    for (d, b) in dst.iter_mut().zip(bytes.iter().take(len)) {
        *d = *b as c_char;
    }
    for d in dst.iter_mut().skip(len) {
        *d = 0;
    }
}

/// Reads a fixed-size array up to its first NUL (or its full length when no
/// terminator is present) as lossy UTF-8.
pub fn fixed_to_string(src: &[c_char]) -> String {
    let len = src.iter().position(|&c| c == 0).unwrap_or(src.len());
    let bytes: Vec<u8> = src[..len].iter().map(|&c| c as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Reads a library-allocated C string as lossy UTF-8.
///
/// Returns `None` for a null pointer; the vendor leaves optional texts null.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that remains valid
/// for the duration of the call.
pub unsafe fn ptr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn write_and_read_back() {
        let mut name = [0 as c_char; 16];
        write_fixed(&mut name, "Incident");
        assert_eq!(fixed_to_string(&name), "Incident");
    }

    #[test]
    fn write_truncates_at_capacity() {
        let mut name = [0 as c_char; 4];
        write_fixed(&mut name, "abcdef");
        assert_eq!(fixed_to_string(&name), "abc");
        assert_eq!(name[3], 0);
    }

    #[test]
    fn write_clears_previous_contents() {
        let mut name = [0 as c_char; 8];
        write_fixed(&mut name, "longer");
        write_fixed(&mut name, "ab");
        assert_eq!(fixed_to_string(&name), "ab");
        assert!(name[3..].iter().all(|&c| c == 0));
    }

    #[test]
    fn unterminated_array_reads_full_length() {
        let src = [b'a' as c_char; 4];
        assert_eq!(fixed_to_string(&src), "aaaa");
    }

    #[test]
    fn null_pointer_reads_none() {
        assert_eq!(unsafe { ptr_to_string(std::ptr::null()) }, None);
    }

    proptest! {
        #[test]
        fn ascii_round_trips_below_capacity(s in "[ -~]{0,15}") {
            let mut name = [0 as c_char; 16];
            write_fixed(&mut name, &s);
            prop_assert_eq!(fixed_to_string(&name), s);
        }

        #[test]
        fn write_never_panics_and_terminates(s in ".*") {
            let mut name = [0 as c_char; 16];
            write_fixed(&mut name, &s);
            prop_assert!(name.iter().any(|&c| c == 0));
        }
    }
}
