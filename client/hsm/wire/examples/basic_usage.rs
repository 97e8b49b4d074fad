//! Basic usage example for the HSM command codec.

use hsm_wire::{
    decode_response, encode_frame, Aead, Command, GenerateAead, MonitorExit, StatusCode,
    ValidateAead, WrappedSecret,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== HSM Command Codec Example ===\n");

    let nonce = *b"\x4d\x4d\x4d\x4d\x4d\x4d";

    // 1. Pack a wrapped secret
    println!("1. Packing a wrapped secret...");
    let secret = WrappedSecret::new(&[0x41; 16], &[0x4D, 0x01, 0x4D, 0x02, 0x4D, 0x03])?;
    let packed = secret.pack();
    println!("   Packed length: {} bytes", packed.len());

    // 2. Build a generate frame
    println!("\n2. Building a generate frame...");
    let generate = GenerateAead::new(nonce, 0x2000, packed.clone());
    let frame = encode_frame(&generate);
    println!("   Opcode: {:#04x}", frame[0]);
    println!("   Frame size: {} bytes", frame.len());
    println!("   Expected response: {:?}", generate.response());

    // 3. Decode a response the device could send back
    println!("\n3. Decoding a device response...");
    let mut response = vec![StatusCode::Ok as u8];
    response.extend_from_slice(&[0xC3; 30]); // ciphertext + tag stand-in
    let aead: Aead = decode_response(&generate, &response)?;
    println!("   Sealed data: {} bytes", aead.data().len());
    println!("   Sealed payload: {} bytes", aead.payload_len());

    // 4. Build the matching validate frame
    println!("\n4. Building a validate frame...");
    let validate = ValidateAead::new(nonce, 0x2000, &aead, packed);
    let frame = encode_frame(&validate);
    println!("   Frame size: {} bytes", frame.len());
    println!("   Response carries status only: {:?}", validate.response());

    // 5. The monitor-exit handshake
    println!("\n5. Monitor-exit handshake bytes...");
    let frame = encode_frame(&MonitorExit);
    let rendered: Vec<String> = frame.iter().map(|b| format!("{b:02x}")).collect();
    println!("   {}", rendered.join(" "));
    println!("   (no response is ever read for this frame)");

    Ok(())
}
