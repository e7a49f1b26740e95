use std::fmt;

/// EGL error code, as returned by `eglGetError`.
///
/// `EGL_SUCCESS` is not represented; APIs use `Option<EglError>` or `Result`
/// for that case.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EglError {
    NotInitialized,
    BadAccess,
    BadAlloc,
    BadAttribute,
    BadConfig,
    BadContext,
    BadCurrentSurface,
    BadDisplay,
    BadMatch,
    BadNativePixmap,
    BadNativeWindow,
    BadParameter,
    BadSurface,
    ContextLost,
    /// Code outside the EGL 1.4 core set.
    Unknown(i32),
}

impl EglError {
    pub const SUCCESS: i32 = 0x3000;

    /// Decodes a raw EGL error code. Returns `None` for `EGL_SUCCESS`.
    pub fn from_code(code: i32) -> Option<Self> {
        let err = match code {
            Self::SUCCESS => return None,
            0x3001 => EglError::NotInitialized,
            0x3002 => EglError::BadAccess,
            0x3003 => EglError::BadAlloc,
            0x3004 => EglError::BadAttribute,
            0x3005 => EglError::BadConfig,
            0x3006 => EglError::BadContext,
            0x3007 => EglError::BadCurrentSurface,
            0x3008 => EglError::BadDisplay,
            0x3009 => EglError::BadMatch,
            0x300A => EglError::BadNativePixmap,
            0x300B => EglError::BadNativeWindow,
            0x300C => EglError::BadParameter,
            0x300D => EglError::BadSurface,
            0x300E => EglError::ContextLost,
            other => EglError::Unknown(other),
        };
        Some(err)
    }

    /// Raw EGL error code.
    pub fn code(self) -> i32 {
        match self {
            EglError::NotInitialized => 0x3001,
            EglError::BadAccess => 0x3002,
            EglError::BadAlloc => 0x3003,
            EglError::BadAttribute => 0x3004,
            EglError::BadConfig => 0x3005,
            EglError::BadContext => 0x3006,
            EglError::BadCurrentSurface => 0x3007,
            EglError::BadDisplay => 0x3008,
            EglError::BadMatch => 0x3009,
            EglError::BadNativePixmap => 0x300A,
            EglError::BadNativeWindow => 0x300B,
            EglError::BadParameter => 0x300C,
            EglError::BadSurface => 0x300D,
            EglError::ContextLost => 0x300E,
            EglError::Unknown(code) => code,
        }
    }
}

impl fmt::Display for EglError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EglError::NotInitialized => "EGL_NOT_INITIALIZED",
            EglError::BadAccess => "EGL_BAD_ACCESS",
            EglError::BadAlloc => "EGL_BAD_ALLOC",
            EglError::BadAttribute => "EGL_BAD_ATTRIBUTE",
            EglError::BadConfig => "EGL_BAD_CONFIG",
            EglError::BadContext => "EGL_BAD_CONTEXT",
            EglError::BadCurrentSurface => "EGL_BAD_CURRENT_SURFACE",
            EglError::BadDisplay => "EGL_BAD_DISPLAY",
            EglError::BadMatch => "EGL_BAD_MATCH",
            EglError::BadNativePixmap => "EGL_BAD_NATIVE_PIXMAP",
            EglError::BadNativeWindow => "EGL_BAD_NATIVE_WINDOW",
            EglError::BadParameter => "EGL_BAD_PARAMETER",
            EglError::BadSurface => "EGL_BAD_SURFACE",
            EglError::ContextLost => "EGL_CONTEXT_LOST",
            EglError::Unknown(code) => return write!(f, "unknown EGL error {code:#x}"),
        };
        write!(f, "{name} ({:#x})", self.code())
    }
}

impl std::error::Error for EglError {}

/// Repair performed in response to an EGL error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EglErrorAction {
    /// `EGL_SUCCESS`; nothing to repair.
    Nothing,
    /// Context destroyed; rebuilt on the next frame.
    RecreateContext,
    /// Surface destroyed; rebuilt on the next frame.
    RecreateSurface,
    /// Display and everything on it destroyed; rebuilt on the next frame.
    RecreateDisplay,
    /// No repair known. The current frame is lost; the process keeps running.
    Unhandled,
}

impl EglErrorAction {
    #[inline]
    pub fn is_handled(self) -> bool {
        self != EglErrorAction::Unhandled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_code_decodes_to_none() {
        assert_eq!(EglError::from_code(EglError::SUCCESS), None);
    }

    #[test]
    fn known_codes_round_trip() {
        for code in 0x3001..=0x300E {
            let err = EglError::from_code(code).unwrap();
            assert!(!matches!(err, EglError::Unknown(_)));
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn unknown_code_is_preserved() {
        assert_eq!(EglError::from_code(0x3100), Some(EglError::Unknown(0x3100)));
        assert_eq!(EglError::Unknown(0x3100).to_string(), "unknown EGL error 0x3100");
    }

    #[test]
    fn display_names_the_error() {
        assert_eq!(EglError::BadSurface.to_string(), "EGL_BAD_SURFACE (0x300d)");
    }
}
