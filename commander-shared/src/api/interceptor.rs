use super::ApiError;

/// Hook invoked by the transport for every failed backend call.
///
/// Interceptors observe errors; they cannot change or swallow them. The
/// session registers one to drop its credential on `401` so that transport
/// code never has to know about navigation.
pub trait ErrorInterceptor {
    /// Called once per failed call, before the error reaches the caller.
    fn on_error(&self, error: &ApiError);
}

impl<F> ErrorInterceptor for F
where
    F: Fn(&ApiError),
{
    fn on_error(&self, error: &ApiError) {
        self(error);
    }
}
