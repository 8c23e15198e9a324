// Copyright (C) 2023, Alex Badics
// This file is part of hmd-orientation
// Licensed under the MIT license. See LICENSE file in the project root for details.

use hmd_orientation::{simulator::SimulatedSdk, terminal::StdTerminal, Session};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut session = Session::new(SimulatedSdk::new(), StdTerminal::new())?;
    session.output()?;
    let readouts = session.run_loop()?;
    log::info!("Stopped after {readouts} readouts");
    session.close()?;
    Ok(())
}
