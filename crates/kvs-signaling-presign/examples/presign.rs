//! Produce a presigned KVS signaling URL from static inputs and print it.
//!
//! The host comes from a `GetSignalingChannelEndpoint` response (master and
//! viewer endpoints differ) and the channel ARN rides as a query parameter;
//! both are placeholders here. Opening the WebSocket with the printed URL is
//! left to whatever transport the application uses.
//!
//! ```text
//! RUST_LOG=debug cargo run --example presign
//! ```

use chrono::Utc;
use http::Uri;
use kvs_signaling_presign::{PresignError, presign};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), PresignError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let uri: Uri = "wss://v-a1b2c3d4.kinesisvideo.us-west-2.amazonaws.com\
        ?X-Amz-ChannelARN=arn:aws:kinesisvideo:us-west-2:123456789012:channel/demo-channel/1234567890123\
        &X-Amz-ClientId=d7d1c6e2-9cb0-4d61-bea9-ecb3d3816557"
        .parse()
        .expect("example URI is well-formed");

    // Session token should be the empty string for long-term credentials.
    let access_key = "YourAccessKey";
    let secret_key = "YourSecretKey";
    let session_token = "YourSessionToken";
    let region = "us-west-2";

    let signed = presign(
        &uri,
        access_key,
        secret_key,
        session_token,
        region,
        Utc::now().timestamp_millis(),
    )?;

    println!("Connect to the WebSocket URL:\n{signed}");
    Ok(())
}
