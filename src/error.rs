#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum JSError {
    #[error("Type error: {message}")]
    TypeError {
        message: String,
        file: String,
        line: usize,
        method: String,
    },

    #[error("Range error: {message}")]
    RangeError {
        message: String,
        file: String,
        line: usize,
        method: String,
    },

    #[error("Syntax error: {message}")]
    SyntaxError {
        message: String,
        file: String,
        line: usize,
        method: String,
    },

    #[error("Maximum recursion depth exceeded (limit {limit})")]
    RecursionLimit { limit: usize },
}

impl JSError {
    /// Name of the native error constructor this error maps to when it has
    /// to be surfaced as a JavaScript value.
    pub fn kind_name(&self) -> &'static str {
        match self {
            JSError::TypeError { .. } => "TypeError",
            JSError::RangeError { .. } | JSError::RecursionLimit { .. } => "RangeError",
            JSError::SyntaxError { .. } => "SyntaxError",
        }
    }

    pub fn message(&self) -> String {
        match self {
            JSError::TypeError { message, .. } | JSError::RangeError { message, .. } | JSError::SyntaxError { message, .. } => {
                message.clone()
            }
            JSError::RecursionLimit { .. } => "Maximum call stack size exceeded".to_string(),
        }
    }
}

impl From<JSError> for std::io::Error {
    fn from(err: JSError) -> std::io::Error {
        std::io::Error::other(err.to_string())
    }
}

// The raise_* macros capture the call site with `file!()` and `line!()`,
// which only expand at the invocation point when used from a macro.
#[macro_export]
macro_rules! raise_type_error {
    ($msg:expr) => {
        $crate::JSError::TypeError {
            message: $msg.to_string(),
            file: file!().to_string(),
            line: line!() as usize,
            method: $crate::function_name!().to_string(),
        }
    };
}

#[macro_export]
macro_rules! raise_range_error {
    ($msg:expr) => {
        $crate::JSError::RangeError {
            message: $msg.to_string(),
            file: file!().to_string(),
            line: line!() as usize,
            method: $crate::function_name!().to_string(),
        }
    };
}

#[macro_export]
macro_rules! raise_syntax_error {
    ($msg:expr) => {
        $crate::JSError::SyntaxError {
            message: $msg.to_string(),
            file: file!().to_string(),
            line: line!() as usize,
            method: $crate::function_name!().to_string(),
        }
    };
}

#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        // remove the trailing "::f"
        &name[..name.len() - 3]
    }};
}
