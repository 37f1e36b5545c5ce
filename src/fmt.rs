use crate::Uri;
use std::fmt;

impl fmt::Debug for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uri")
            .field("scheme", &self.scheme())
            .field("userinfo", &self.encoded_userinfo())
            .field("host", &self.encoded_host())
            .field("port", &self.port())
            .field("path", &self.encoded_path())
            .field("query", &self.encoded_query())
            .field("fragment", &self.encoded_fragment())
            .finish()
    }
}

impl fmt::Display for Uri {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}
