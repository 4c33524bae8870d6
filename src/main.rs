use clap::{Arg, Command};
use log::LevelFilter;
use std::io::Read;
use std::process;
use urlsift::{EmailAnalyzer, EmailRequest, EngineConfig};

fn main() {
    let matches = Command::new("urlsift")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract the clickable destination URLs from an email body")
        .long_about(
            "Finds the links a recipient would actually see in an HTML or plain-text email body,\n\
             unwraps SafeLinks and click-tracking redirectors, strips tracking parameters and\n\
             prints the distinct destinations in sorted order.",
        )
        .arg(
            Arg::new("input")
                .value_name("FILE")
                .help("Email body to analyze ('-' or omitted reads stdin)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("YAML configuration file (built-in tables are used when omitted)"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the default configuration to FILE and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the configuration, print its tables and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("subject")
                .long("subject")
                .value_name("TEXT")
                .help("Email subject, logged with the result"),
        )
        .arg(
            Arg::new("message")
                .long("message")
                .help("Input is a full message with headers; the body starts after the first blank line")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("features")
                .long("features")
                .help("Also print markup and URL feature counts")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the analysis as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging for every pipeline decision")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config = match load_config(matches.get_one::<String>("config")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    if matches.get_flag("test-config") {
        print_config(&config);
        return;
    }

    let input = matches
        .get_one::<String>("input")
        .map(String::as_str)
        .unwrap_or("-");
    let content = match read_input(input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {input}: {e}");
            process::exit(1);
        }
    };

    let request = if matches.get_flag("message") {
        split_message(&content)
    } else {
        EmailRequest {
            body: content,
            ..Default::default()
        }
    };
    let request = match matches.get_one::<String>("subject") {
        Some(subject) => EmailRequest {
            subject: subject.clone(),
            ..request
        },
        None => request,
    };

    let analysis = EmailAnalyzer::new(&config).analyze(&request);

    if matches.get_flag("json") {
        match serde_json::to_string_pretty(&analysis) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing result: {e}");
                process::exit(1);
            }
        }
        return;
    }

    if !analysis.subject.is_empty() {
        println!("Subject: {}", analysis.subject);
    }
    println!("URLs found in body ({}):", analysis.urls.len());
    for (i, url) in analysis.urls.iter().enumerate() {
        println!("  {}. {}", i + 1, url);
    }

    if matches.get_flag("features") {
        println!();
        for vector in &analysis.features {
            println!("{} features:", vector.extractor);
            for (name, value) in &vector.features {
                println!("  {name:<14} {value}");
            }
        }
    }
}

fn load_config(path: Option<&String>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load_or_default(path),
        None => Ok(EngineConfig::default()),
    }
}

fn generate_default_config(path: &str) {
    let config = EngineConfig::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Edit the wrapper rules and ignore lists to suit your mail flow.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

fn print_config(config: &EngineConfig) {
    if let Err(e) = config.validate() {
        println!("❌ Configuration validation failed:");
        println!("Error: {e}");
        process::exit(1);
    }

    println!("🔍 Wrapper rules (max depth {}):", config.max_depth);
    for (i, rule) in config.wrapper_rules.iter().enumerate() {
        println!("  Rule {}: {} -> ?{}=", i + 1, rule.domain_marker, rule.query_param);
    }
    println!("Tracking parameters: {}", config.tracking_params.join(", "));
    println!("Ignored domains: {}", config.ignored_domains.join(", "));
    println!("Ignored extensions: {}", config.ignored_extensions.join(", "));
    println!("Noise tags: {}", config.noise_tags.join(", "));
    println!("✅ Configuration is valid");
}

fn read_input(path: &str) -> std::io::Result<String> {
    let bytes = if path == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        std::fs::read(path)?
    };
    // Bodies often carry stray non-UTF-8 bytes ahead of the markup
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Split a raw message into its Subject header and body.
fn split_message(content: &str) -> EmailRequest {
    let mut request = EmailRequest::default();
    let mut in_headers = true;
    let mut last_header: Option<String> = None;

    for line in content.lines() {
        if !in_headers {
            request.body.push_str(line);
            request.body.push('\n');
            continue;
        }

        if line.trim().is_empty() {
            in_headers = false;
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            // Folded continuation of the previous header
            match last_header.as_deref() {
                Some("subject") => {
                    request.subject.push(' ');
                    request.subject.push_str(line.trim());
                }
                Some("from") => {
                    request.sender.push(' ');
                    request.sender.push_str(line.trim());
                }
                _ => {}
            }
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim().to_lowercase();
            match key.as_str() {
                "subject" => request.subject = value.trim().to_string(),
                "from" => request.sender = value.trim().to_string(),
                _ => {}
            }
            last_header = Some(key);
        }
    }

    request
}
