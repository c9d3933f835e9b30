// SPDX-License-Identifier: MPL-2.0
//! Build script for platform-specific resources.
//!
//! On Windows, this embeds version information into the executable so it
//! shows up properly in the taskbar and file explorer.

fn main() {
    #[cfg(target_os = "windows")]
    {
        let res = winresource::WindowsResource::new();
        res.compile().expect("Failed to compile Windows resources");
    }
}
