//! RDAP Bootstrap - look up AS numbers, IP networks, domains and entities
//!
//! Finds the responsible RDAP server through the IANA bootstrap registries and
//! prints what it knows about each identifier.

use anyhow::{anyhow, bail, Context};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use rdap_bootstrap::{
    response::RdapObject, ClientConfig, ObjectKind, ObjectReference, RdapClient, RdapError,
};
use std::env;
use std::io::IsTerminal;
use std::process;
use std::time::Duration;

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    kind: Option<ObjectKind>,
    service: Option<String>,
    url_only: bool,
    identifiers: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize the library
    if let Err(e) = rdap_bootstrap::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let args: Vec<String> = env::args().skip(1).collect();

    // Check for help
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("💡 Run 'rdap-bootstrap --help' for usage");
            process::exit(1);
        }
    };

    match run(options).await {
        Ok(true) => Ok(()),
        Ok(false) => process::exit(1),
        Err(e) => {
            match e.downcast_ref::<RdapError>() {
                Some(rdap_error) => eprintln!("{}", rdap_error.user_message()),
                None => eprintln!("❌ Error: {:#}", e),
            }
            process::exit(1);
        }
    }
}

fn parse_args(args: &[String]) -> anyhow::Result<Options> {
    let mut options = Options::default();
    let mut args = args.iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--type" | "-t" => {
                let value = args.next().ok_or_else(|| anyhow!("{} needs an object type", arg))?;
                options.kind = Some(value.parse()?);
            }
            "--service" | "-s" => {
                let value = args.next().ok_or_else(|| anyhow!("{} needs a URL", arg))?;
                options.service = Some(value.clone());
            }
            "--url-only" | "-u" => options.url_only = true,
            flag if flag.starts_with('-') => bail!("Unknown option '{}'", flag),
            identifier => options.identifiers.push(identifier.to_string()),
        }
    }

    if options.identifiers.is_empty() {
        bail!("No identifier given");
    }

    Ok(options)
}

/// Build references, resolve and query them; returns whether every lookup succeeded
async fn run(options: Options) -> anyhow::Result<bool> {
    let config = ClientConfig::from_env()?;
    let client = RdapClient::with_config(config)?;

    let mut references = Vec::with_capacity(options.identifiers.len());
    for identifier in &options.identifiers {
        let mut reference = ObjectReference::new(identifier.as_str());
        if let Some(kind) = options.kind {
            reference = reference.with_kind(kind);
        } else if reference.kind().is_err() {
            let kind = ask_kind(&reference)?;
            reference = reference.with_kind(kind);
        }
        if let Some(service) = &options.service {
            reference = reference.with_service(service);
        }
        references.push(reference);
    }

    if options.url_only {
        let urls = join_all(references.iter().map(|r| client.object_url(r))).await;
        let mut all_ok = true;
        for (reference, url) in references.iter().zip(urls) {
            match url {
                Ok(url) => println!("{}", url),
                Err(e) => {
                    all_ok = false;
                    eprintln!("{}: {}", reference, e.user_message());
                }
            }
        }
        return Ok(all_ok);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message(format!("Querying {} object(s)...", references.len()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let results = join_all(references.iter().map(|r| lookup(&client, r))).await;
    spinner.finish_and_clear();

    let mut all_ok = true;
    for (reference, result) in references.iter().zip(results) {
        match result {
            Ok((url, object)) => display_object(reference, &url, &object),
            Err(e) => {
                all_ok = false;
                eprintln!("⚠️  {}", reference);
                eprintln!("{}", e.user_message());
                println!();
            }
        }
    }

    Ok(all_ok)
}

async fn lookup(
    client: &RdapClient,
    reference: &ObjectReference,
) -> rdap_bootstrap::Result<(String, RdapObject)> {
    let kind = reference.kind()?;
    let url = client.object_url(reference).await?;
    let object = client.query_url(&url, kind).await?;
    Ok((url, object))
}

/// Domains and entity handles look alike; let the user say which one is meant
fn ask_kind(reference: &ObjectReference) -> anyhow::Result<ObjectKind> {
    if !std::io::stdin().is_terminal() {
        return Err(RdapError::classification(reference.identifier()).into());
    }

    let prompt = format!("What kind of object is '{}'?", reference);
    inquire::Select::new(&prompt, vec![ObjectKind::Domain, ObjectKind::Entity])
        .prompt()
        .context("No object type selected")
}

fn display_object(reference: &ObjectReference, url: &str, object: &RdapObject) {
    let common = object.common();

    println!("🔎 {}", reference);
    println!("   🌐 {}", url);
    if let Some(handle) = object.handle() {
        println!("   🏷️  Handle: {}", handle);
    }
    if let Some(name) = object.display_name() {
        println!("   📛 Name: {}", name);
    }

    match object {
        RdapObject::Autnum(autnum) => {
            if let (Some(start), Some(end)) = (autnum.start_autnum, autnum.end_autnum) {
                println!("   🔢 Range: {} - {}", start, end);
            }
        }
        RdapObject::IpNetwork(network) => {
            if let (Some(start), Some(end)) = (&network.start_address, &network.end_address) {
                println!("   🔢 Range: {} - {}", start, end);
            }
        }
        RdapObject::Domain(domain) => {
            for nameserver in domain.nameservers.iter().filter_map(|ns| ns.ldh_name.as_deref()) {
                println!("   🖥️  Nameserver: {}", nameserver);
            }
        }
        RdapObject::Entity(entity) => {
            if !entity.roles.is_empty() {
                println!("   👤 Roles: {}", entity.roles.join(", "));
            }
        }
    }

    if let Some(registrar) = common.registrar().and_then(|r| r.full_name()) {
        println!("   🏢 Registrar: {}", registrar);
    }
    if !common.status.is_empty() {
        println!("   📌 Status: {}", common.status.join(", "));
    }
    for event in &common.events {
        println!("   📅 {}: {}", event.event_action, event.event_date);
    }
    println!();
}

/// Print help information
fn print_help() {
    println!("🔎 RDAP Bootstrap - find and query the right RDAP server");
    println!("═══════════════════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    rdap-bootstrap [OPTIONS] <IDENTIFIER>...");
    println!();
    println!("OPTIONS:");
    println!("    -t, --type <TYPE>      Object type: asn, domain, entity, ipv4, ipv6");
    println!("    -s, --service <URL>    Query this RDAP server instead of bootstrapping");
    println!("    -u, --url-only         Print the query URL without fetching the object");
    println!("    -h, --help             Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    rdap-bootstrap AS13335                    # Autonomous system");
    println!("    rdap-bootstrap 1.1.1.0/24 2001:db8::1     # IP networks");
    println!("    rdap-bootstrap -t domain example.com      # Domain name");
    println!("    rdap-bootstrap -t entity EXAMPLE-RIPE     # Entity handle");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    RDAP_TIMEOUT_SECS   Request timeout in seconds (default: 30)");
    println!("    RDAP_USER_AGENT     User-Agent header");
    println!("    RDAP_SERVICE_URL    Fixed RDAP server for every query");
    println!("    RDAP_BOOTSTRAP_URL  Bootstrap registry location (default: {})", rdap_bootstrap::IANA_BOOTSTRAP_URL);
    println!("    RDAP_POOL_SIZE      Idle connections kept per host (default: 4)");
}
