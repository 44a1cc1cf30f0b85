use crate::config::Config;
use anyhow::Context;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    net::{TcpStream, ToSocketAddrs},
};

const PROMPT: &str = "fileshed> ";

/// Sends one request over a fresh connection and returns the whole reply.
pub async fn send<A: ToSocketAddrs>(addr: A, line: &str) -> anyhow::Result<String> {
    let mut stream = TcpStream::connect(addr).await.context("connecting to server")?;
    stream.write_all(line.as_bytes()).await.context("sending request")?;
    stream.shutdown().await.context("closing write half")?;
    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).await.context("reading response")?;
    Ok(String::from_utf8_lossy(&reply).into_owned())
}

/// Interactive prompt on stdin/stdout: one connection per typed line, until `exit`
/// or end of input.
pub async fn shell(cfg: &Config) -> anyhow::Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    run_shell(cfg.addr().as_str(), input, tokio::io::stdout()).await
}

/// Empty lines are skipped; whitespace-only lines are sent and answered like any other.
pub async fn run_shell<A, R, W>(addr: A, input: R, mut output: W) -> anyhow::Result<()>
where
    A: ToSocketAddrs + Copy,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;
        let Some(line) = lines.next_line().await? else { break };
        if line.is_empty() {
            continue;
        }
        match send(addr, &line).await {
            Ok(reply) => {
                output.write_all(reply.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
            Err(e) => eprintln!("{e:#}"),
        }
        if line.trim() == "exit" {
            break;
        }
    }
    output.flush().await?;
    Ok(())
}
