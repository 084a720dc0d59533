use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which covers every failure the scanner and the emitters can report.
///
/// # Error Categories
///
/// ## File Parsing Errors
/// - [`Error::Malformed`] - Corrupted or invalid PE / metadata structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond the end of a buffer
/// - [`Error::NotSupported`] - Input is a native PE image without a CLR runtime header
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::RecursionLimit`] - Signature nesting exceeded the parser limit
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::GoblinErr`] - PE parsing errors from the goblin crate
///
/// ## Interop Errors
/// - [`Error::MissingEntryPoint`] - A P/Invoke method without usable import metadata
/// - [`Error::NonBlittableReturn`] / [`Error::NonBlittableParameter`] - A callback signature
///   that cannot cross the native boundary
/// - [`Error::DuplicateTrampoline`] - Two callbacks derive the same trampoline name
///
/// # Examples
///
/// ```rust,no_run
/// use pinvokegen::{Error, Generator, GeneratorOptions};
///
/// let options = GeneratorOptions::new().assembly("App.dll");
/// match Generator::new(options).render() {
///     Ok(text) => println!("{text}"),
///     Err(Error::NonBlittableParameter { method, type_name, .. }) => {
///         eprintln!("{method} takes non-blittable {type_name}");
///     }
///     Err(e) => eprintln!("generation failed: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The file is damaged and could not be parsed.
    ///
    /// Carries the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The PE image has no CLR runtime header, so it is not a managed module.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),

    /// Signature parsing exceeded the maximum nesting depth.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// A method is flagged as a native import but its import metadata does not name an
    /// entry point, so no declaration can be produced for it.
    #[error("P/Invoke method '{method}' has no entry point in its import metadata")]
    MissingEntryPoint {
        /// Identity of the offending method
        method: String,
    },

    /// The return type of a native callback cannot cross the native boundary.
    #[error("The return type '{type_name}' of pinvoke callback method '{method}' needs to be blittable.")]
    NonBlittableReturn {
        /// Identity of the offending method
        method: String,
        /// Full name of the offending type
        type_name: String,
    },

    /// A parameter of a native callback cannot cross the native boundary.
    #[error("Parameter {index} of type '{type_name}' of pinvoke callback method '{method}' needs to be blittable.")]
    NonBlittableParameter {
        /// Identity of the offending method
        method: String,
        /// Zero-based position of the parameter
        index: usize,
        /// Full name of the offending type
        type_name: String,
    },

    /// Two different callbacks derived the same trampoline name.
    #[error("Two callbacks with the same name '{name}' are not supported.")]
    DuplicateTrampoline {
        /// The colliding trampoline identifier
        name: String,
    },

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}
