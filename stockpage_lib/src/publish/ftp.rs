//! FTP uploader.

use std::fmt;
use std::fs::File;
use std::path::Path;

use suppaftp::types::FileType;
use suppaftp::FtpStream;

use super::{PublishError, Uploader};
use crate::config::{ConfigError, PublishConfig};

/// Uploads a file with a single binary `STOR` over plain FTP.
#[derive(Clone)]
pub struct FtpUploader {
    host: String,
    port: u16,
    username: String,
    password: String,
    remote_path: String,
}

impl fmt::Debug for FtpUploader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FtpUploader")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("remote_path", &self.remote_path)
            .finish_non_exhaustive()
    }
}

impl FtpUploader {
    pub fn new(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        remote_path: &str,
    ) -> Self {
        Self {
            host: host.to_string(),
            port,
            username: username.to_string(),
            password: password.to_string(),
            remote_path: remote_path.to_string(),
        }
    }

    /// Builds an uploader from config. Both credentials must be present.
    pub fn from_config(config: &PublishConfig) -> Result<Self, ConfigError> {
        let (username, password) = config.credentials()?;
        Ok(Self::new(
            &config.host,
            config.port,
            username,
            password,
            &config.remote_path,
        ))
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }

    fn store(&self, stream: &mut FtpStream, file: &mut File) -> Result<u64, PublishError> {
        stream
            .login(self.username.as_str(), self.password.as_str())
            .map_err(|e| PublishError::Login {
                user: self.username.clone(),
                reason: e.to_string(),
            })?;
        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| self.transfer_error(e))?;
        stream
            .put_file(self.remote_path.as_str(), file)
            .map_err(|e| self.transfer_error(e))
    }

    fn transfer_error(&self, e: suppaftp::FtpError) -> PublishError {
        PublishError::Transfer {
            remote_path: self.remote_path.clone(),
            reason: e.to_string(),
        }
    }
}

impl Uploader for FtpUploader {
    fn upload(&self, local: &Path) -> Result<u64, PublishError> {
        let mut file = File::open(local)?;
        let addr = self.address();

        tracing::info!("Connecting to ftp://{}", addr);
        let mut stream = FtpStream::connect(addr.as_str()).map_err(|e| PublishError::Connect {
            addr: addr.clone(),
            reason: e.to_string(),
        })?;

        let stored = self.store(&mut stream, &mut file);

        // The session is closed whether or not the store went through.
        if let Err(e) = stream.quit() {
            tracing::warn!("Failed to close FTP session with {}: {}", addr, e);
        }

        let bytes = stored?;
        tracing::info!("Uploaded {} bytes to {}", bytes, self.remote_path);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use std::time::Duration;

    const IO_TIMEOUT: Duration = Duration::from_secs(5);

    /// Replies for a scripted single-session FTP server.
    struct Script {
        pass_reply: &'static str,
        /// `None` accepts the upload over the passive data connection.
        stor_reply: Option<&'static str>,
    }

    struct Session {
        commands: Vec<String>,
        received: Vec<u8>,
    }

    fn spawn_server(script: Script) -> (u16, JoinHandle<Session>) {
        let control = TcpListener::bind("127.0.0.1:0").unwrap();
        let data = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = control.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let (stream, _) = control.accept().unwrap();
            stream.set_read_timeout(Some(IO_TIMEOUT)).unwrap();
            let mut writer = stream.try_clone().unwrap();
            let mut reader = BufReader::new(stream);
            let mut session = Session {
                commands: Vec::new(),
                received: Vec::new(),
            };

            writer.write_all(b"220 ready\r\n").unwrap();
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
                let command = line.trim_end().to_string();
                let verb = command.split(' ').next().unwrap_or("").to_uppercase();
                session.commands.push(command);

                let reply = match verb.as_str() {
                    "USER" => "331 password required".to_string(),
                    "PASS" => script.pass_reply.to_string(),
                    "TYPE" => "200 type set".to_string(),
                    "PASV" => {
                        let p = data.local_addr().unwrap().port();
                        format!(
                            "227 Entering Passive Mode (127,0,0,1,{},{})",
                            p >> 8,
                            p & 0xff
                        )
                    }
                    "STOR" => match script.stor_reply {
                        Some(reply) => reply.to_string(),
                        None => {
                            writer.write_all(b"150 opening data connection\r\n").unwrap();
                            let (mut conn, _) = data.accept().unwrap();
                            conn.set_read_timeout(Some(IO_TIMEOUT)).unwrap();
                            conn.read_to_end(&mut session.received).unwrap();
                            "226 transfer complete".to_string()
                        }
                    },
                    "QUIT" => {
                        writer.write_all(b"221 bye\r\n").unwrap();
                        break;
                    }
                    _ => "502 not implemented".to_string(),
                };
                writer.write_all(format!("{}\r\n", reply).as_bytes()).unwrap();
            }
            session
        });

        (port, handle)
    }

    fn page_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<html><body>quotes</body></html>").unwrap();
        path
    }

    fn publish_config(username: Option<&str>, password: Option<&str>) -> PublishConfig {
        PublishConfig {
            host: "ftp.example.com".to_string(),
            port: 2121,
            remote_path: "/public_html/index.html".to_string(),
            username: username.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn from_config_with_credentials() {
        let uploader = FtpUploader::from_config(&publish_config(Some("alice"), Some("pw"))).unwrap();
        assert_eq!(uploader.address(), "ftp.example.com:2121");
        assert_eq!(uploader.remote_path(), "/public_html/index.html");
    }

    #[test]
    fn from_config_without_password() {
        let err = FtpUploader::from_config(&publish_config(Some("alice"), None)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
    }

    #[test]
    fn debug_hides_password() {
        let uploader = FtpUploader::new("h", 21, "alice", "hunter2", "/index.html");
        assert!(!format!("{:?}", uploader).contains("hunter2"));
    }

    #[test]
    fn missing_local_file_fails_before_connecting() {
        let uploader = FtpUploader::new("127.0.0.1", 9, "alice", "pw", "/index.html");
        let err = uploader
            .upload(Path::new("/nonexistent/index.html"))
            .unwrap_err();
        assert!(matches!(err, PublishError::Io(_)));
    }

    #[test]
    fn refused_connection_is_connect_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<html></html>").unwrap();

        // Bind then drop to get a port nothing listens on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let uploader = FtpUploader::new("127.0.0.1", port, "alice", "pw", "/index.html");
        let err = uploader.upload(&path).unwrap_err();
        assert!(matches!(err, PublishError::Connect { .. }));
    }

    #[test]
    fn rejected_login_still_quits() {
        let dir = tempfile::tempdir().unwrap();
        let path = page_file(&dir);
        let (port, server) = spawn_server(Script {
            pass_reply: "530 Login incorrect.",
            stor_reply: None,
        });

        let uploader = FtpUploader::new("127.0.0.1", port, "alice", "pw", "/index.html");
        let err = uploader.upload(&path).unwrap_err();
        assert!(matches!(err, PublishError::Login { ref user, .. } if user == "alice"));

        let session = server.join().unwrap();
        assert_eq!(session.commands, vec!["USER alice", "PASS pw", "QUIT"]);
    }

    #[test]
    fn failed_store_still_quits() {
        let dir = tempfile::tempdir().unwrap();
        let path = page_file(&dir);
        let (port, server) = spawn_server(Script {
            pass_reply: "230 logged in",
            stor_reply: Some("553 Could not create file."),
        });

        let uploader = FtpUploader::new("127.0.0.1", port, "alice", "pw", "/public_html/index.html");
        let err = uploader.upload(&path).unwrap_err();
        assert!(matches!(
            err,
            PublishError::Transfer { ref remote_path, .. } if remote_path == "/public_html/index.html"
        ));

        let session = server.join().unwrap();
        assert_eq!(session.commands.last().map(String::as_str), Some("QUIT"));
        assert!(session.received.is_empty());
    }

    #[test]
    fn successful_store_sends_file_in_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = page_file(&dir);
        let (port, server) = spawn_server(Script {
            pass_reply: "230 logged in",
            stor_reply: None,
        });

        let uploader = FtpUploader::new("127.0.0.1", port, "alice", "pw", "/public_html/index.html");
        let bytes = uploader.upload(&path).unwrap();

        let session = server.join().unwrap();
        let content = std::fs::read(&path).unwrap();
        assert_eq!(bytes, content.len() as u64);
        assert_eq!(session.received, content);
        assert!(session.commands.contains(&"TYPE I".to_string()));
        assert!(session
            .commands
            .contains(&"STOR /public_html/index.html".to_string()));
        assert_eq!(session.commands.last().map(String::as_str), Some("QUIT"));
    }
}
