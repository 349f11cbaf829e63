// Remote seam: everything the keeper knows about the management endpoint
pub mod connector;
pub mod object_name;
pub mod target;

#[cfg(test)]
pub(crate) mod mock;

pub use connector::{
    CompactionManagerProxy, Credentials, FailureDetectorProxy, RemoteConnector, RemoteHandle,
    RemoteSession, SessionObjectNames, StorageServiceProxy,
};
pub use object_name::ObjectName;
pub use target::RemoteTarget;
