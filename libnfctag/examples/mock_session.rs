// Tag session against a scripted controller

// This example wires a TagEngine to the MockController with a simulated
// ISO-DEP tag, runs discovery, and performs a few operations the way an
// application would against real hardware.

use std::sync::Arc;

use libnfctag::prelude::*;
use libnfctag::test_support::{SimulatedTag, iso_dep_tag};
use libnfctag::utils::sync::lock;

fn main() -> Result<()> {
    env_logger::init();

    let tag = Arc::new(std::sync::Mutex::new(iso_dep_tag(1)));
    let sim = Arc::clone(&tag);
    let controller = Arc::new(MockController::with_responder(move |cmd| {
        lock(&sim).respond(cmd)
    }));
    let engine = TagEngine::builder(controller.clone()).build()?;
    let handler: Arc<dyn EventHandler> = engine.clone();
    controller.attach(&handler);

    println!("Starting discovery...");
    engine.start_discovery()?;
    let discovered = discovery_event(&lock(&tag));
    controller.inject(discovered);

    let Some(summary) = engine.tag_summary() else {
        println!("No tag activated");
        return Ok(());
    };
    println!("Tag UID = {}", summary.uid.to_hex());
    for tech in &summary.technologies {
        println!("  technology: {}", tech);
    }

    let info = engine.check_ndef()?;
    println!("NDEF: {:?}", info);

    engine.write(b"\xD1\x01\x05T\x02enhi")?;
    println!("Read back: {}", bytes_to_hex_spaced(&engine.read()?));

    lock(&tag).responses.push_back(vec![0x90, 0x00]);
    let rsp = engine.transceive(&[0x00, 0xA4, 0x04, 0x00, 0x00], None)?;
    println!("SELECT -> {}", bytes_to_hex(&rsp));

    println!("Present: {}", engine.presence_check());
    engine.disconnect()?;
    println!("Disconnected, active = {}", engine.is_active());
    Ok(())
}

fn discovery_event(tag: &SimulatedTag) -> ControllerEvent {
    ControllerEvent::DiscoveryResult {
        protocol: tag.protocol,
        handle: tag.handle,
        params: tag.params.clone(),
        more_follows: false,
    }
}
