// Shorthand for return Err(SoundError::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)          -> return Err(SoundError::new(ErrorKind::Variant))
// - err!(Variant(Value))   -> return Err(SoundError::new(ErrorKind::Variant(Value)))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::SoundError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($value:expr)) => {
		return Err(crate::error::SoundError::new(
			crate::error::ErrorKind::$variant($value),
		))
	};
}

// Shorthand for FileDecodingError::new(ContainerKind::Foo, "Message")
//
// Usage:
//
// - decode_err!(Variant, Message)
// - decode_err!(Message)
//
// or bail:
//
// - decode_err!(@BAIL Variant, Message)
// - decode_err!(@BAIL Message)
macro_rules! decode_err {
	($kind:ident, $reason:literal) => {
		Into::<crate::error::SoundError>::into(crate::error::FileDecodingError::new(
			crate::container::ContainerKind::$kind,
			$reason,
		))
	};
	($reason:literal) => {
		Into::<crate::error::SoundError>::into(
			crate::error::FileDecodingError::from_description($reason),
		)
	};
	(@BAIL $($kind:ident,)? $reason:literal) => {
		return Err(decode_err!($($kind,)? $reason))
	};
}

pub(crate) use {decode_err, err};
