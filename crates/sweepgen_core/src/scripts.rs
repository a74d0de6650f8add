//! Fixed-text helper scripts emitted next to the batches

/// Two-line script compiling the simulation against the classpath
pub fn compile_script(compiler: &str, classpath: Option<&str>, sources: &str) -> String {
    match classpath {
        Some(cp) => format!("#!/bin/bash\n{compiler} -classpath \"{cp}\" {sources}\n"),
        None => format!("#!/bin/bash\n{compiler} {sources}\n"),
    }
}

/// Script submitting every launcher to the scheduler, in batch order
pub fn queue_script<S: AsRef<str>>(scheduler: &str, launchers: &[S]) -> String {
    let mut out = String::from("#!/bin/bash\n");
    for launcher in launchers {
        out.push_str(scheduler);
        out.push(' ');
        out.push_str(launcher.as_ref());
        out.push('\n');
    }
    out
}
