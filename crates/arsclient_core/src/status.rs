//! Decoding of the diagnostics list every native call produces.

use arsclient_sys as sys;
use std::fmt;
use std::os::raw::c_uint;

/// Severity band of one diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational note.
    Note,
    /// Warning; the call still succeeded.
    Warning,
    /// Error; the call failed.
    Error,
    /// Fatal error; the session is unusable.
    Fatal,
}

impl Severity {
    /// Maps the vendor's message type code to a severity band. Codes above
    /// the known range are treated as fatal rather than silently dropped.
    #[must_use]
    pub fn from_raw(raw: c_uint) -> Self {
        match raw {
            0 => Self::Note,
            1 => Self::Warning,
            2 => Self::Error,
            _ => Self::Fatal,
        }
    }

    /// Whether this band is at or above the error threshold.
    #[must_use]
    pub fn is_error(self) -> bool {
        self >= Self::Error
    }
}

/// One decoded diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Severity band.
    pub severity: Severity,
    /// Vendor message number.
    pub code: i64,
    /// Message text; empty when the vendor supplied none.
    pub text: String,
    /// Appended detail text, if any.
    pub appended: Option<String>,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?} {}] {}", self.severity, self.code, self.text)?;
        if let Some(appended) = &self.appended {
            write!(f, " ({appended})")?;
        }
        Ok(())
    }
}

/// Decodes a native status list into owned records, in order. The input is
/// never mutated and remains owned by the caller.
///
/// # Safety
///
/// `list` must either be zero-filled or populated by the library: when
/// `num_items` is non-zero, `status_list` must point to that many records
/// whose text pointers are null or valid NUL-terminated strings.
pub unsafe fn decode_list(list: &sys::ARStatusList) -> Vec<StatusMessage> {
    if list.status_list.is_null() || list.num_items == 0 {
        return Vec::new();
    }
    let records = std::slice::from_raw_parts(list.status_list, list.num_items as usize);
    records
        .iter()
        .map(|record| StatusMessage {
            severity: Severity::from_raw(record.message_type),
            code: record.message_num as i64,
            text: sys::strings::ptr_to_string(record.message_text).unwrap_or_default(),
            appended: sys::strings::ptr_to_string(record.appended_text),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::os::raw::c_char;

    #[test]
    fn severity_bands() {
        assert_eq!(Severity::from_raw(0), Severity::Note);
        assert_eq!(Severity::from_raw(1), Severity::Warning);
        assert_eq!(Severity::from_raw(2), Severity::Error);
        assert_eq!(Severity::from_raw(7), Severity::Fatal);
        assert!(!Severity::Warning.is_error());
        assert!(Severity::Error.is_error());
        assert!(Severity::Fatal.is_error());
    }

    #[test]
    fn decode_empty_list() {
        let list = <sys::ARStatusList as sys::ZeroInit>::zeroed();
        assert!(unsafe { decode_list(&list) }.is_empty());
    }

    #[test]
    fn decode_preserves_order_and_detail() {
        let text_a = CString::new("Failure during checking of the qualification").unwrap();
        let appended_a = CString::new("near token =").unwrap();
        let text_b = CString::new("Field does not exist").unwrap();

        let mut records = [
            sys::ARStatusStruct {
                message_type: 2,
                message_num: 90,
                message_text: text_a.as_ptr() as *mut c_char,
                appended_text: appended_a.as_ptr() as *mut c_char,
            },
            sys::ARStatusStruct {
                message_type: 1,
                message_num: 314,
                message_text: text_b.as_ptr() as *mut c_char,
                appended_text: std::ptr::null_mut(),
            },
        ];
        let list = sys::ARStatusList {
            num_items: records.len() as u32,
            status_list: records.as_mut_ptr(),
        };

        let decoded = unsafe { decode_list(&list) };
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].severity, Severity::Error);
        assert_eq!(decoded[0].code, 90);
        assert_eq!(decoded[0].appended.as_deref(), Some("near token ="));
        assert_eq!(decoded[1].severity, Severity::Warning);
        assert_eq!(decoded[1].appended, None);
        assert_eq!(
            decoded[0].to_string(),
            "[Error 90] Failure during checking of the qualification (near token =)"
        );
    }

    #[test]
    fn decode_tolerates_null_text() {
        let mut records = [sys::ARStatusStruct {
            message_type: 2,
            message_num: 91,
            message_text: std::ptr::null_mut(),
            appended_text: std::ptr::null_mut(),
        }];
        let list = sys::ARStatusList {
            num_items: 1,
            status_list: records.as_mut_ptr(),
        };
        let decoded = unsafe { decode_list(&list) };
        assert_eq!(decoded[0].text, "");
        assert_eq!(decoded[0].appended, None);
    }
}
