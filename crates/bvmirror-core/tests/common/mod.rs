pub mod daemon_server;
