use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::client::{Client, ClientRegistry, handle_client};
use crate::config::{ServerConfig, StartupConfig};
use crate::error::ServerError;
use crate::protocol::responses;
use crate::session::SessionWorkflow;

pub struct Server {
    client_registry: Arc<Mutex<ClientRegistry>>,
    workflow: Arc<Mutex<SessionWorkflow>>,
    listener: TcpListener,
    config: Arc<StartupConfig>,
}

impl Server {
    /// Binds the listener and builds a fresh, empty account store.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let addr = config.startup.control_socket();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            client_registry: Arc::new(Mutex::new(ClientRegistry::new())),
            workflow: Arc::new(Mutex::new(SessionWorkflow::new(&config.policy))),
            listener,
            config: Arc::new(config.startup),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. Runs until the process exits.
    pub async fn start(&self) {
        info!(
            "Starting flipflop-auth on {} (max {} clients)",
            self.config.control_socket(),
            self.config.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => self.admit(stream, addr).await,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }

    /// Registers the client and spawns its session task, or turns it away
    /// when the server is full.
    async fn admit(&self, stream: TcpStream, addr: SocketAddr) {
        {
            let mut clients = self.client_registry.lock().await;
            if clients.len() >= self.config.max_clients {
                drop(clients);
                warn!("Rejecting {}: too many connections", addr);
                tokio::spawn(reject(stream, addr));
                return;
            }
            clients.insert(addr, Client::default());
            info!(
                "Accepted client {} ({}/{} clients)",
                addr,
                clients.len(),
                self.config.max_clients
            );
        }

        let client_registry = Arc::clone(&self.client_registry);
        let workflow = Arc::clone(&self.workflow);
        let config = Arc::clone(&self.config);

        // Spawn a task for each client so the accept loop doesn't block
        tokio::spawn(async move {
            handle_client(stream, addr, client_registry, workflow, config).await;
        });
    }
}

async fn reject(mut stream: TcpStream, addr: SocketAddr) {
    let reply = responses::protocol_error(responses::TOO_MANY_CONNECTIONS, "TooManyConnections");
    if let Err(e) = stream.write_all(reply.as_bytes()).await {
        warn!("Failed to notify rejected client {}: {}", addr, e);
    }
    let _ = stream.shutdown().await;
}
