use std::any::{Any, TypeId};
use std::fmt::Display;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Behaviour to convert a raw Cli token into a value of type `T`.
///
/// Closures of the shape `Fn(&str) -> Result<T, String>` are converters.
pub trait StringConverter<T>: Send + Sync {
    /// Convert a single token.
    /// The error message should explain why `value` is not a valid `T`.
    fn convert(&self, value: &str) -> Result<T, String>;

    /// Convert a token destined for a collection.
    /// A converter may expand one token into many elements (ex: a comma separated list).
    fn convert_all(&self, value: &str) -> Result<Vec<T>, String> {
        self.convert(value).map(|converted| vec![converted])
    }
}

impl<T, F> StringConverter<T> for F
where
    F: Fn(&str) -> Result<T, String> + Send + Sync,
{
    fn convert(&self, value: &str) -> Result<T, String> {
        self(value)
    }
}

/// Converts through [`std::str::FromStr`].
pub struct FromStrConverter<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Default for FromStrConverter<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> StringConverter<T> for FromStrConverter<T>
where
    T: FromStr,
    T::Err: Display,
{
    fn convert(&self, value: &str) -> Result<T, String> {
        T::from_str(value).map_err(|error| error.to_string())
    }
}

/// Passes the token through unchanged.
#[derive(Default)]
pub struct IdentityConverter;

impl StringConverter<String> for IdentityConverter {
    fn convert(&self, value: &str) -> Result<String, String> {
        Ok(value.to_string())
    }
}

/// Splits each token on a delimiter, converting every part with the inner converter.
///
/// Only collection parameters see more than one element; a single valued parameter requires exactly one part.
pub struct SplitConverter<T> {
    inner: Arc<dyn StringConverter<T>>,
    delimiter: char,
}

impl<T> SplitConverter<T> {
    /// Split on `delimiter`.
    pub fn new(inner: impl StringConverter<T> + 'static, delimiter: char) -> Self {
        Self {
            inner: Arc::new(inner),
            delimiter,
        }
    }

    /// Split on commas.
    pub fn comma(inner: impl StringConverter<T> + 'static) -> Self {
        Self::new(inner, ',')
    }
}

impl<T> StringConverter<T> for SplitConverter<T> {
    fn convert(&self, value: &str) -> Result<T, String> {
        let mut parts = self.convert_all(value)?;

        if parts.len() == 1 {
            Ok(parts.remove(0))
        } else {
            Err(format!(
                "expected a single value, found {} separated by '{}'",
                parts.len(),
                self.delimiter
            ))
        }
    }

    fn convert_all(&self, value: &str) -> Result<Vec<T>, String> {
        value
            .split(self.delimiter)
            .map(|part| self.inner.convert(part))
            .collect()
    }
}

/// A converter with its target type erased, as produced by a [`ConverterFactory`].
pub struct ErasedConverter(Box<dyn Any + Send + Sync>);

impl ErasedConverter {
    /// Erase the type of `converter`.
    pub fn new<T: 'static>(converter: Arc<dyn StringConverter<T>>) -> Self {
        Self(Box::new(converter))
    }

    /// Erase the type of a concrete converter.
    pub fn from_converter<T: 'static>(converter: impl StringConverter<T> + 'static) -> Self {
        Self::new(Arc::new(converter) as Arc<dyn StringConverter<T>>)
    }

    pub(crate) fn downcast<T: 'static>(self) -> Option<Arc<dyn StringConverter<T>>> {
        self.0
            .downcast::<Arc<dyn StringConverter<T>>>()
            .ok()
            .map(|converter| *converter)
    }
}

/// Behaviour to supply converters by target type.
///
/// Register factories via [`register_converter_factory`].
pub trait ConverterFactory: Send + Sync {
    /// Produce a converter for the `target` type, if this factory knows how.
    /// The returned converter must convert into precisely the `target` type.
    fn converter(&self, target: TypeId) -> Option<ErasedConverter>;
}

/// A factory serving a single target type.
pub struct TypeConverterFactory<T> {
    converter: Arc<dyn StringConverter<T>>,
}

impl<T> TypeConverterFactory<T> {
    /// Serve `converter` for the type `T`.
    pub fn new(converter: impl StringConverter<T> + 'static) -> Self {
        Self {
            converter: Arc::new(converter),
        }
    }
}

impl<T: 'static> ConverterFactory for TypeConverterFactory<T> {
    fn converter(&self, target: TypeId) -> Option<ErasedConverter> {
        if target == TypeId::of::<T>() {
            Some(ErasedConverter::new(self.converter.clone()))
        } else {
            None
        }
    }
}

/// The factory consulted before any registered factory.
/// Supplies [`FromStrConverter`] for the primitive types and [`PathBuf`].
#[derive(Default)]
pub struct DefaultConverterFactory;

macro_rules! from_str_converters {
    ($target:expr, $($t:ty),+ $(,)?) => {
        $(
            if $target == TypeId::of::<$t>() {
                return Some(ErasedConverter::from_converter(FromStrConverter::<$t>::default()));
            }
        )+
    };
}

impl ConverterFactory for DefaultConverterFactory {
    fn converter(&self, target: TypeId) -> Option<ErasedConverter> {
        from_str_converters!(
            target, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
            f32, f64, PathBuf,
        );
        None
    }
}

static FACTORIES: RwLock<Vec<Arc<dyn ConverterFactory>>> = RwLock::new(Vec::new());

/// Append a factory to the process-wide converter registry.
///
/// Factories are consulted in registration order, after the [`DefaultConverterFactory`].
/// Converters are resolved when a parameter is added to a parser, so register factories before configuring any parser.
pub fn register_converter_factory(factory: impl ConverterFactory + 'static) {
    FACTORIES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(Arc::new(factory));
}

/// Find the converter for `T`: the default factory first, then the registered factories, then identity for `String`.
pub(crate) fn resolve_converter<T: 'static>() -> Option<Arc<dyn StringConverter<T>>> {
    let target = TypeId::of::<T>();

    if let Some(converter) = DefaultConverterFactory
        .converter(target)
        .and_then(ErasedConverter::downcast::<T>)
    {
        return Some(converter);
    }

    let factories = FACTORIES.read().unwrap_or_else(PoisonError::into_inner);

    // A factory that answers for the wrong type is skipped, rather than trusted.
    if let Some(converter) = factories
        .iter()
        .filter_map(|factory| factory.converter(target))
        .find_map(ErasedConverter::downcast::<T>)
    {
        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Resolved {} through a registered factory.",
                std::any::type_name::<T>()
            );
        }

        return Some(converter);
    }

    let identity: Arc<dyn StringConverter<String>> = Arc::new(IdentityConverter);
    ErasedConverter::new(identity).downcast::<T>()
}
