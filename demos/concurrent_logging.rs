use std::sync::mpsc::channel;

use mtlog_verbose::{Verbosity, logger, set_verbosity};

fn main() {
    set_verbosity(Verbosity::Debug);
    mtlog_verbose::info!("Hello, world!");
    let (handles, senders): (Vec<_>, Vec<_>) = (0..5)
        .map(|i| {
            let (sender, receiver) = channel::<&'static str>();
            (
                std::thread::spawn(move || {
                    let logger = logger!("thread %d", i);
                    for message in receiver {
                        mtlog_verbose::warn!(logger => "MESSAGE RECEIVED: %s", message);
                    }
                }),
                sender,
            )
        })
        .unzip();
    for sender in &senders {
        sender.send("Hello, world!").unwrap();
    }
    drop(senders);
    for handle in handles {
        handle.join().unwrap();
    }
    set_verbosity(Verbosity::Silent);
    mtlog_verbose::info!("not printed");
    mtlog_verbose::error!("errors always print, %d threads joined", 5);
}
