pub mod requester;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use requester::AuthenticatedRequester;
pub use transport::{
    FilePart, HttpRequest, MultipartBody, MultipartPart, ReqwestTransport, RequestAuth,
    RequestBody, Transport,
};
