//! Translation port: resolves label keys such as `BASIC.TITLE` into text.

/// Looks up localized text by key.
///
/// Lookups never fail: implementations fall back to a default locale and,
/// when the key is unknown everywhere, return the key itself.
pub trait Translator {
    fn lookup<'a>(&'a self, key: &'a str) -> &'a str;
}

impl<T: Translator + ?Sized> Translator for &T {
    fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        (**self).lookup(key)
    }
}
