// Simple dig style command line, for A records only.
// dig [@server] {domain}...
mod util;

use log::info;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::process;
use std::time::Duration;
use stubdns::clients::udp::DEFAULT_SERVER;
use stubdns::clients::{Exchanger, UdpClient};
use stubdns::Query;

// A simple type alias so as to DRY.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, PartialEq)]
struct Args {
    server: String,

    /// Wait this long for each response.
    timeout: Duration,

    /// Look up all these domains
    domains: Vec<String>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Args> {
    let mut result = Args {
        server: DEFAULT_SERVER.to_string(),
        timeout: Duration::from_secs(5),
        domains: Vec::new(),
    };

    for arg in args {
        if let Some(server) = arg.strip_prefix('@') {
            // Allow the port to be left off, as real dig does.
            result.server = match server.parse::<IpAddr>() {
                Ok(ip) => SocketAddr::new(ip, 53).to_string(),
                Err(_) => server.to_string(),
            };
        } else if let Some(secs) = arg.strip_prefix("+timeout=") {
            result.timeout = Duration::from_secs(secs.parse()?);
        } else if arg.starts_with('+') {
            return Err(format!("Unknown flag: {}", arg).into());
        } else {
            result.domains.push(arg)
        }
    }

    if result.domains.is_empty() {
        return Err("no domain given".into());
    }

    Ok(result)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: dig [@server] [+timeout=secs] {{domain}}...");
            process::exit(1);
        }
    };

    let client = UdpClient::new(args.server.as_str())?.with_timeout(Some(args.timeout));

    for domain in &args.domains {
        let query = Query::new(domain);

        println!("query:");
        util::hexdump(&query.to_vec()?);
        println!();

        info!("asking {} about {}", args.server, domain);
        let resp = match client.exchange(&query) {
            Ok(resp) => resp,
            Err(e) => {
                eprintln!(";; {}: {}", domain, e);
                continue;
            }
        };

        println!("response:");
        println!("{}", resp);

        for entry in resp.entries() {
            let ttl = entry.ttl.as_secs();
            println!("{}", entry);
            println!("\tTime to live: {} minutes, {} seconds", ttl / 60, ttl % 60);
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(args: &[&str]) -> Result<Args> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(
            args(&["@8.8.8.8", "+timeout=2", "example.com", "example.org"]).unwrap(),
            Args {
                server: "8.8.8.8:53".to_string(),
                timeout: Duration::from_secs(2),
                domains: vec!["example.com".to_string(), "example.org".to_string()],
            }
        );

        assert_eq!(args(&["example.com"]).unwrap().server, DEFAULT_SERVER);
        assert_eq!(args(&["@127.0.0.1:5353", "a"]).unwrap().server, "127.0.0.1:5353");
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&[]).is_err());
        assert!(args(&["+tcp", "example.com"]).is_err());
        assert!(args(&["+timeout=soon", "example.com"]).is_err());
    }
}
