//! Output backends for emitting plugin lines.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

/// Output destination for rendered lines.
///
/// The host agent reads standard output, which is the default.
#[derive(Debug, Default)]
pub enum Output {
    /// Write lines to standard output.
    #[default]
    Stdout,

    /// Write lines to a file.
    ///
    /// The file is overwritten on each run.
    File(PathBuf),

    /// Send lines through a channel.
    ///
    /// Use `Output::channel()` to create this variant and get the receiver.
    Channel(tokio::sync::mpsc::Sender<String>),
}

impl Output {
    /// Create a file output.
    ///
    /// # Example
    ///
    /// ```rust
    /// use epgwatch_sdk::Output;
    ///
    /// let output = Output::file("epgstation.out");
    /// ```
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Output::File(path.into())
    }

    /// Create a channel output and return both the output and receiver.
    ///
    /// Useful when embedding the plugin and handling lines yourself.
    ///
    /// # Example
    ///
    /// ```rust
    /// use epgwatch_sdk::Output;
    ///
    /// let (output, mut rx) = Output::channel(16);
    ///
    /// // Later, receive lines
    /// // while let Some(line) = rx.recv().await {
    /// //     println!("{line}");
    /// // }
    /// ```
    pub fn channel(buffer: usize) -> (Self, tokio::sync::mpsc::Receiver<String>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (Output::Channel(tx), rx)
    }

    /// Emit lines to this output.
    pub(crate) async fn emit(&self, lines: &[String]) -> std::io::Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(join_lines(lines).as_bytes()).await?;
                stdout.flush().await?;
            }
            Output::File(path) => {
                tokio::fs::write(path, join_lines(lines)).await?;
            }
            Output::Channel(tx) => {
                for line in lines {
                    // Receiver gone means nobody is listening anymore.
                    if tx.send(line.clone()).await.is_err() {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

fn join_lines(lines: &[String]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}
