/// Conversion between a struct field and the string form the hook works with.
///
/// Used by `#[derive(Document)]`; every non-skipped field must implement it.
pub trait FieldValue: Sized {
    /// None when the field is unset.
    fn to_field_value(&self) -> Option<String>;

    /// None when `value` cannot be represented by this type.
    fn from_field_value(value: String) -> Option<Self>;

    /// False for unset and falsy values (empty, zero, `false`).
    fn is_set(&self) -> bool {
        self.to_field_value().is_some_and(|value| !value.is_empty())
    }
}

impl FieldValue for String {
    fn to_field_value(&self) -> Option<String> {
        Some(self.clone())
    }

    fn from_field_value(value: String) -> Option<Self> {
        Some(value)
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_field_value(&self) -> Option<String> {
        self.as_ref().and_then(T::to_field_value)
    }

    fn from_field_value(value: String) -> Option<Self> {
        T::from_field_value(value).map(Some)
    }

    fn is_set(&self) -> bool {
        self.as_ref().is_some_and(T::is_set)
    }
}

impl FieldValue for bool {
    fn to_field_value(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn from_field_value(value: String) -> Option<Self> {
        value.parse().ok()
    }

    fn is_set(&self) -> bool {
        *self
    }
}

macro_rules! impl_integer_field_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn to_field_value(&self) -> Option<String> {
                    Some(self.to_string())
                }

                fn from_field_value(value: String) -> Option<Self> {
                    value.parse().ok()
                }

                fn is_set(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

impl_integer_field_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
