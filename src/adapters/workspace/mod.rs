pub mod signature_workspace;
