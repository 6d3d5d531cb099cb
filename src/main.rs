// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use enacttoken::pipeline::{Outcome, Pipeline};
use enacttoken::store::{MemoNodeStore, Node};
use enacttoken::token::{
    AttestationQuote, ByteOrderPolicy, Decoder, SignatureBlock, Verdict,
};
use log::{debug, error, info};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::Path;
use uuid::Uuid;

#[derive(Parser)]
enum EnactTokenCli {
    Decode(DecodeArgs),
    Verify(VerifyArgs),
    Golden(GoldenArgs),
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Decode the supplied quote and signature blobs and print them \
    in JSON, along with their canonical form")]
struct DecodeArgs {
    #[arg(short, long, default_value = "quote.bin")]
    quote: String,

    #[arg(short, long, default_value = "signature.bin")]
    signature: String,

    /// JSON byte-order policy, defaults to the EnactTrust agent's
    #[arg(short, long)]
    layout: Option<String>,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Cryptographically verify the supplied quote using the AK of \
    the matching node from the node store")]
struct VerifyArgs {
    #[arg(short, long, default_value = "quote.bin")]
    quote: String,

    #[arg(short, long, default_value = "signature.bin")]
    signature: String,

    #[arg(short, long, default_value = "nodes.json")]
    nodestore: String,

    /// Require the quote to carry this node-id
    #[arg(long)]
    node_id: Option<Uuid>,

    /// JSON byte-order policy, defaults to the EnactTrust agent's
    #[arg(short, long)]
    layout: Option<String>,

    /// Where to save the canonical evidence on success
    #[arg(short, long)]
    out: Option<String>,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Verify the supplied quote using the given AK and, on success, \
    enroll the node it identifies into the node store")]
struct GoldenArgs {
    #[arg(short, long, default_value = "quote.bin")]
    quote: String,

    #[arg(short, long, default_value = "signature.bin")]
    signature: String,

    #[arg(short, long, default_value = "ak-pub.pem")]
    ak_pub: String,

    #[arg(short, long, default_value = "nodes.json")]
    nodestore: String,
}

#[derive(Serialize)]
struct DecodedEvidence<'a> {
    quote: &'a AttestationQuote,
    signature: &'a SignatureBlock,
    #[serde(rename = "node-id", skip_serializing_if = "Option::is_none")]
    node_id: Option<Uuid>,
    canonical: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match EnactTokenCli::parse() {
        EnactTokenCli::Decode(args) => match decode(&args) {
            Ok(j) => println!("{j}"),
            Err(e) => error!("decoding failed: {e}"),
        },

        EnactTokenCli::Verify(args) => match verify(&args) {
            Ok(o) => info!("verification successful for node {}", o.node_id),
            Err(e) => error!("verification failed: {e}"),
        },

        EnactTokenCli::Golden(args) => match golden(&args) {
            Ok(id) => info!("node {id} enrolled"),
            Err(e) => error!("golden values extraction failed: {e}"),
        },
    }
}

fn load_policy(layout: &Option<String>) -> Result<ByteOrderPolicy, Box<dyn Error>> {
    match layout {
        None => Ok(ByteOrderPolicy::AGENT),
        Some(f) => {
            let j = fs::read_to_string(f)?;
            let p = ByteOrderPolicy::from_json(&j)?;
            debug!("using byte-order policy from {f}: {p:?}");
            Ok(p)
        }
    }
}

fn decode(args: &DecodeArgs) -> Result<String, Box<dyn Error>> {
    let policy = load_policy(&args.layout)?;

    let q: Vec<u8> = fs::read(&args.quote)?;
    let s: Vec<u8> = fs::read(&args.signature)?;

    let e = Decoder::new(policy).decode(&q, &s)?;

    let d = DecodedEvidence {
        quote: &e.quote,
        signature: &e.signature,
        node_id: e.node_id().ok(),
        canonical: hex::encode(e.canonical.as_bytes()),
    };

    Ok(serde_json::to_string_pretty(&d)?)
}

fn verify(args: &VerifyArgs) -> Result<Outcome, Box<dyn Error>> {
    let policy = load_policy(&args.layout)?;

    let j = fs::read_to_string(&args.nodestore)?;

    let nodes = MemoNodeStore::new();
    nodes.load_json(&j)?;
    debug!("loaded {} node(s) from {}", nodes.len(), args.nodestore);

    let q: Vec<u8> = fs::read(&args.quote)?;
    let s: Vec<u8> = fs::read(&args.signature)?;

    let o = Pipeline::with_policy(&nodes, policy)
        .process_claimed(args.node_id.as_ref(), &q, &s)
        .map_err(|e| {
            debug!("pipeline stopped at {}", e.stage());
            e
        })?;

    if let Some(out) = &args.out {
        fs::write(out, o.evidence.as_bytes())?;
        info!("canonical evidence saved to {out}");
    }

    Ok(o)
}

fn golden(args: &GoldenArgs) -> Result<Uuid, Box<dyn Error>> {
    let q: Vec<u8> = fs::read(&args.quote)?;
    let s: Vec<u8> = fs::read(&args.signature)?;

    let e = Decoder::default().decode(&q, &s)?;
    let node_id = e.node_id()?;

    let ak_pub = fs::read_to_string(&args.ak_pub)?;
    let node = Node::new(node_id, &ak_pub);

    if e.verify(&node)? != Verdict::Verified {
        return Err(format!("quote for node {node_id} not signed by {}", args.ak_pub).into());
    }

    let nodes = MemoNodeStore::new();

    if Path::new(&args.nodestore).exists() {
        nodes.load_json(&fs::read_to_string(&args.nodestore)?)?;
    }

    nodes.upsert(node)?;

    fs::write(&args.nodestore, nodes.to_json()?)?;

    Ok(node_id)
}
