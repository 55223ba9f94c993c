//! Connection configuration.

/// Configuration for opening a connection.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server to connect to.
    pub server: String,
    /// User to authenticate as.
    pub user: String,
    /// Credential for `user`.
    pub password: String,
    /// Port override; zero leaves the server default in place.
    pub port: u16,
    /// RPC program number override; zero leaves the server default in place.
    pub rpc_program_number: u32,
}

impl ServerConfig {
    /// Creates a configuration with no port or RPC program overrides.
    #[must_use]
    pub fn new(
        server: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            user: user.into(),
            password: password.into(),
            port: 0,
            rpc_program_number: 0,
        }
    }

    /// Sets the port override.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the RPC program number override.
    #[must_use]
    pub fn rpc_program_number(mut self, number: u32) -> Self {
        self.rpc_program_number = number;
        self
    }

    /// Whether a port binding call is required after initialization.
    pub(crate) fn wants_port_binding(&self) -> bool {
        self.port != 0 || self.rpc_program_number != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_skip_port_binding() {
        let config = ServerConfig::new("ars1.example.com", "svc", "secret");
        assert!(!config.wants_port_binding());
        assert_eq!(config.port, 0);
    }

    #[test]
    fn builder_pattern() {
        let config = ServerConfig::new("ars1.example.com", "svc", "secret")
            .port(4100)
            .rpc_program_number(390626);
        assert!(config.wants_port_binding());
        assert_eq!(config.port, 4100);
        assert_eq!(config.rpc_program_number, 390626);
    }

    #[test]
    fn rpc_number_alone_requires_binding() {
        let config = ServerConfig::new("s", "u", "p").rpc_program_number(390621);
        assert!(config.wants_port_binding());
    }
}
