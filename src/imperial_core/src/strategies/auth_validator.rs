use async_trait::async_trait;

/// Validates the credentials carried by an inbound request before any
/// handler runs.
///
/// The validator receives request parts (headers, method, URI, extensions)
/// rather than the full request, so non-`Sync` bodies never have to cross
/// an await point.
#[async_trait]
pub trait AuthValidator: Clone + Send + Sync + 'static {
    /// What a successful validation attaches to the request, e.g. the
    /// authenticated account id.
    type Claims: Clone + Send + Sync + 'static;

    /// Typically `http::request::Parts`.
    type RequestParts;

    type Error: std::error::Error + Send + Sync + 'static;

    /// Extract the credential from `parts` and check it.
    ///
    /// # Errors
    ///
    /// Fails if no credential is present or it does not validate.
    async fn validate(&self, parts: &Self::RequestParts) -> Result<Self::Claims, Self::Error>;
}
