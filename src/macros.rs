// Shorthand for return Err(TagmendError::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)          -> return Err(TagmendError::new(ErrorKind::Variant))
// - err!(Variant(Message)) -> return Err(TagmendError::new(ErrorKind::Variant(Message)))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::TagmendError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($reason:expr)) => {
		return Err(crate::error::TagmendError::new(
			crate::error::ErrorKind::$variant($reason),
		))
	};
}

// Shorthand for FormatError::new(FormatErrorKind::Foo)
//
// Usage:
//
// - format_err!(Variant)
// - format_err!(Variant(Args))
//
// or bail:
//
// - format_err!(@BAIL Variant)
// - format_err!(@BAIL Variant(Args))
macro_rules! format_err {
	($variant:ident) => {
		Into::<crate::error::TagmendError>::into(crate::error::FormatError::new(
			crate::error::FormatErrorKind::$variant,
		))
	};
	($variant:ident($($arg:expr),+)) => {
		Into::<crate::error::TagmendError>::into(crate::error::FormatError::new(
			crate::error::FormatErrorKind::$variant($($arg),+),
		))
	};
	(@BAIL $variant:ident$(($($arg:expr),+))?) => {
		return Err(format_err!($variant$(($($arg),+))?))
	};
}

pub(crate) use {err, format_err};
