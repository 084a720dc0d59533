use crate::{
    file::parser::Parser,
    metadata::{
        signatures::{
            SignatureArray, SignatureMethod, SignatureParameter, SignatureTypeSpec, TypeSignature,
        },
        typesystem::ELEMENT_TYPE,
    },
    Error::RecursionLimit,
    Result,
};

/// Deepest type nesting accepted in one signature
const MAX_RECURSION_DEPTH: usize = 50;

/// Calling convention bits of the first signature byte
const SIG_HASTHIS: u8 = 0x20;
const SIG_EXPLICITTHIS: u8 = 0x40;
const SIG_GENERIC: u8 = 0x10;
const SIG_CONVENTION_MASK: u8 = 0x0F;
const SIG_FIELD: u8 = 0x06;
const SIG_LOCAL: u8 = 0x07;
const SIG_PROPERTY: u8 = 0x08;

/// Decoder for signature blobs.
///
/// # Examples
///
/// ```rust
/// use pinvokegen::metadata::signatures::{SignatureParser, TypeSignature};
///
/// // static int64 Sum(double)
/// let mut parser = SignatureParser::new(&[0x00, 0x01, 0x0A, 0x0D]);
/// let method = parser.parse_method_signature()?;
///
/// assert!(!method.has_this);
/// assert_eq!(method.return_type.base, TypeSignature::I8);
/// assert_eq!(method.params[0].base, TypeSignature::R8);
/// # Ok::<(), pinvokegen::Error>(())
/// ```
pub struct SignatureParser<'a> {
    parser: Parser<'a>,
    depth: usize,
}

impl<'a> SignatureParser<'a> {
    /// Create a parser over one signature blob
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        SignatureParser {
            parser: Parser::new(data),
            depth: 0,
        }
    }

    fn parse_type(&mut self) -> Result<TypeSignature> {
        self.depth += 1;
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(RecursionLimit(MAX_RECURSION_DEPTH));
        }

        let result = self.parse_type_inner();
        self.depth -= 1;
        result
    }

    fn parse_type_inner(&mut self) -> Result<TypeSignature> {
        let current_byte = self.parser.read_le::<u8>()?;
        match current_byte {
            ELEMENT_TYPE::VOID => Ok(TypeSignature::Void),
            ELEMENT_TYPE::BOOLEAN => Ok(TypeSignature::Boolean),
            ELEMENT_TYPE::CHAR => Ok(TypeSignature::Char),
            ELEMENT_TYPE::I1 => Ok(TypeSignature::I1),
            ELEMENT_TYPE::U1 => Ok(TypeSignature::U1),
            ELEMENT_TYPE::I2 => Ok(TypeSignature::I2),
            ELEMENT_TYPE::U2 => Ok(TypeSignature::U2),
            ELEMENT_TYPE::I4 => Ok(TypeSignature::I4),
            ELEMENT_TYPE::U4 => Ok(TypeSignature::U4),
            ELEMENT_TYPE::I8 => Ok(TypeSignature::I8),
            ELEMENT_TYPE::U8 => Ok(TypeSignature::U8),
            ELEMENT_TYPE::R4 => Ok(TypeSignature::R4),
            ELEMENT_TYPE::R8 => Ok(TypeSignature::R8),
            ELEMENT_TYPE::I => Ok(TypeSignature::I),
            ELEMENT_TYPE::U => Ok(TypeSignature::U),
            ELEMENT_TYPE::STRING => Ok(TypeSignature::String),
            ELEMENT_TYPE::OBJECT => Ok(TypeSignature::Object),
            ELEMENT_TYPE::TYPEDBYREF => Ok(TypeSignature::TypedByRef),
            ELEMENT_TYPE::PTR => {
                self.skip_custom_mods()?;
                Ok(TypeSignature::Ptr(Box::new(self.parse_type()?)))
            }
            ELEMENT_TYPE::BYREF => Ok(TypeSignature::ByRef(Box::new(self.parse_type()?))),
            ELEMENT_TYPE::VALUETYPE => Ok(TypeSignature::ValueType(
                self.parser.read_compressed_token()?,
            )),
            ELEMENT_TYPE::CLASS => Ok(TypeSignature::Class(self.parser.read_compressed_token()?)),
            ELEMENT_TYPE::VAR => Ok(TypeSignature::GenericParamType(
                self.parser.read_compressed_uint()?,
            )),
            ELEMENT_TYPE::MVAR => Ok(TypeSignature::GenericParamMethod(
                self.parser.read_compressed_uint()?,
            )),
            ELEMENT_TYPE::ARRAY => {
                let base = Box::new(self.parse_type()?);
                let rank = self.parser.read_compressed_uint()?;

                let num_sizes = self.parser.read_compressed_uint()?;
                for _ in 0..num_sizes {
                    self.parser.read_compressed_uint()?;
                }

                // lower bounds are signed, but share the unsigned length encoding
                let num_lo_bounds = self.parser.read_compressed_uint()?;
                for _ in 0..num_lo_bounds {
                    self.parser.read_compressed_uint()?;
                }

                Ok(TypeSignature::Array(SignatureArray { base, rank }))
            }
            ELEMENT_TYPE::SZARRAY => {
                self.skip_custom_mods()?;
                Ok(TypeSignature::SzArray(Box::new(self.parse_type()?)))
            }
            ELEMENT_TYPE::GENERICINST => {
                let peek_byte = self.parser.peek_byte()?;
                if peek_byte != ELEMENT_TYPE::CLASS && peek_byte != ELEMENT_TYPE::VALUETYPE {
                    return Err(malformed_error!(
                        "GENERICINST - Next byte is not TYPE_CLASS or TYPE_VALUE - {}",
                        peek_byte
                    ));
                }

                let base_type = self.parse_type()?;
                let arg_count = self.parser.read_compressed_uint()?;

                let mut type_args = Vec::with_capacity(arg_count.min(64) as usize);
                for _ in 0..arg_count {
                    type_args.push(self.parse_type()?);
                }

                Ok(TypeSignature::GenericInst(Box::new(base_type), type_args))
            }
            ELEMENT_TYPE::FNPTR => Ok(TypeSignature::FnPtr(Box::new(
                self.parse_method_signature()?,
            ))),
            ELEMENT_TYPE::CMOD_REQD | ELEMENT_TYPE::CMOD_OPT => {
                // the modifiers apply to the type that follows them
                self.parser.read_compressed_token()?;
                self.skip_custom_mods()?;
                self.parse_type()
            }
            ELEMENT_TYPE::PINNED => Ok(TypeSignature::Pinned(Box::new(self.parse_type()?))),
            _ => Err(malformed_error!(
                "Unsupported ELEMENT_TYPE - {}",
                current_byte
            )),
        }
    }

    fn skip_custom_mods(&mut self) -> Result<()> {
        while self.parser.has_more_data() {
            let next_byte = self.parser.peek_byte()?;
            if next_byte != ELEMENT_TYPE::CMOD_OPT && next_byte != ELEMENT_TYPE::CMOD_REQD {
                break;
            }

            self.parser.advance()?;
            self.parser.read_compressed_token()?;
        }

        Ok(())
    }

    fn parse_param(&mut self) -> Result<SignatureParameter> {
        self.skip_custom_mods()?;

        let mut by_ref = false;
        if self.parser.peek_byte()? == ELEMENT_TYPE::BYREF {
            self.parser.advance()?;
            by_ref = true;
        }

        Ok(SignatureParameter {
            by_ref,
            base: self.parse_type()?,
        })
    }

    /// Parse a method signature.
    ///
    /// # Errors
    /// Returns an error for field, local or property signatures, truncated blobs, unknown
    /// element types or nesting deeper than the recursion limit.
    pub fn parse_method_signature(&mut self) -> Result<SignatureMethod> {
        self.depth += 1;
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(RecursionLimit(MAX_RECURSION_DEPTH));
        }

        let convention_byte = self.parser.read_le::<u8>()?;
        let calling_convention = convention_byte & SIG_CONVENTION_MASK;
        if matches!(calling_convention, SIG_FIELD | SIG_LOCAL | SIG_PROPERTY) {
            return Err(malformed_error!(
                "Not a method signature - calling convention {}",
                convention_byte
            ));
        }

        let param_count_generic = if convention_byte & SIG_GENERIC != 0 {
            self.parser.read_compressed_uint()?
        } else {
            0
        };
        let param_count = self.parser.read_compressed_uint()?;
        let return_type = self.parse_param()?;

        let mut params = Vec::with_capacity(param_count.min(64) as usize);
        let mut varargs = Vec::new();
        for _ in 0..param_count {
            if self.parser.peek_byte()? == ELEMENT_TYPE::SENTINEL {
                self.parser.advance()?;
                varargs.push(self.parse_param()?);
                continue;
            }

            if varargs.is_empty() {
                params.push(self.parse_param()?);
            } else {
                varargs.push(self.parse_param()?);
            }
        }

        self.depth -= 1;
        Ok(SignatureMethod {
            has_this: convention_byte & SIG_HASTHIS != 0,
            explicit_this: convention_byte & SIG_EXPLICITTHIS != 0,
            calling_convention,
            param_count_generic,
            return_type,
            params,
            varargs,
        })
    }

    /// Parse the signature of a `TypeSpec` row.
    ///
    /// # Errors
    /// Returns an error if the blob does not hold a valid type.
    pub fn parse_type_spec_signature(&mut self) -> Result<SignatureTypeSpec> {
        Ok(SignatureTypeSpec {
            base: self.parse_type()?,
        })
    }
}
