//! IPC between the CLI and the daemon over a Named Pipe.
//!
//! Line-oriented JSON: the client writes one serialized
//! [`Command`], the daemon answers with one [`Response`], and the
//! connection is done. Every request gets a fresh pipe instance.

use std::io::{BufRead, BufReader, Write};
use std::os::windows::io::FromRawHandle;

use ancora_core::WindowResult;
use ancora_core::ipc::{Command, PIPE_NAME, Response};
use windows::Win32::Foundation::{
    CloseHandle, DUPLICATE_SAME_ACCESS, DuplicateHandle, HANDLE, INVALID_HANDLE_VALUE,
};
use windows::Win32::Storage::FileSystem::{
    CreateFileW, FILE_SHARE_NONE, FlushFileBuffers, OPEN_EXISTING, PIPE_ACCESS_DUPLEX,
};
use windows::Win32::System::Pipes::{
    ConnectNamedPipe, CreateNamedPipeW, DisconnectNamedPipe, PIPE_READMODE_BYTE, PIPE_TYPE_BYTE,
    PIPE_UNLIMITED_INSTANCES, PIPE_WAIT, WaitNamedPipeW,
};
use windows::Win32::System::Threading::GetCurrentProcess;
use windows::core::HSTRING;

const GENERIC_READ_WRITE: u32 = 0x80000000 | 0x40000000;

/// The daemon's end of the pipe. One instance serves one request.
pub struct PipeServer {
    handle: HANDLE,
}

impl PipeServer {
    /// Creates a new pipe instance without waiting for a client.
    pub fn create() -> WindowResult<Self> {
        let pipe_name = HSTRING::from(PIPE_NAME);

        // SAFETY: CreateNamedPipeW creates a new named pipe instance.
        // We pass valid parameters and check for INVALID_HANDLE_VALUE.
        let handle = unsafe {
            CreateNamedPipeW(
                &pipe_name,
                PIPE_ACCESS_DUPLEX,
                PIPE_TYPE_BYTE | PIPE_READMODE_BYTE | PIPE_WAIT,
                PIPE_UNLIMITED_INSTANCES,
                512, // output buffer size
                512, // input buffer size
                0,   // default timeout
                None,
            )
        };

        if handle == INVALID_HANDLE_VALUE {
            return Err("Failed to create named pipe".into());
        }

        Ok(Self { handle })
    }

    /// Blocks until a client connects, then reads its command, passes
    /// it to `handler`, and writes the response back.
    ///
    /// Returns the command that was served so the caller can react to
    /// it (notably `Stop`) after the response has gone out.
    pub fn serve_one(
        &self,
        handler: impl FnOnce(&Command) -> Response,
    ) -> WindowResult<Command> {
        // SAFETY: ConnectNamedPipe blocks until a client connects.
        unsafe {
            ConnectNamedPipe(self.handle, None)?;
        }

        let mut reader = BufReader::new(duplicate_handle_as_file(self.handle)?);
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let command: Command = serde_json::from_str(line.trim())?;

        let response = handler(&command);
        let mut writer = duplicate_handle_as_file(self.handle)?;
        writeln!(writer, "{}", serde_json::to_string(&response)?)?;
        writer.flush()?;

        // SAFETY: FlushFileBuffers blocks until the client has read
        // everything; disconnecting earlier would discard unread data
        // and the client would see a broken pipe.
        unsafe {
            let _ = FlushFileBuffers(self.handle);
        }
        // SAFETY: DisconnectNamedPipe frees this instance for reuse.
        unsafe {
            DisconnectNamedPipe(self.handle)?;
        }

        Ok(command)
    }
}

impl Drop for PipeServer {
    fn drop(&mut self) {
        // SAFETY: CloseHandle releases the pipe handle.
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}

/// RAII guard that closes a HANDLE on drop.
struct HandleGuard(HANDLE);

impl Drop for HandleGuard {
    fn drop(&mut self) {
        // SAFETY: CloseHandle releases the handle the guard owns.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Sends a command to the daemon and returns its response. Client side,
/// used by the CLI.
pub fn send_command(command: &Command) -> WindowResult<Response> {
    let pipe_name = HSTRING::from(PIPE_NAME);

    // SAFETY: CreateFileW opens an existing named pipe as a client.
    let handle = unsafe {
        CreateFileW(
            &pipe_name,
            GENERIC_READ_WRITE,
            FILE_SHARE_NONE,
            None,
            OPEN_EXISTING,
            Default::default(),
            None,
        )?
    };

    let _guard = HandleGuard(handle);

    let mut writer = duplicate_handle_as_file(handle)?;
    writeln!(writer, "{}", serde_json::to_string(command)?)?;
    writer.flush()?;

    let mut reader = BufReader::new(duplicate_handle_as_file(handle)?);
    let mut line = String::new();
    reader.read_line(&mut line)?;

    let response: Response = serde_json::from_str(line.trim())?;
    Ok(response)
}

/// Checks whether the daemon's pipe exists (i.e. the daemon is running).
///
/// `WaitNamedPipeW` with a 1 ms timeout only probes for the pipe's
/// existence; unlike `CreateFileW` it does not consume a connection.
pub fn is_daemon_running() -> bool {
    let pipe_name = HSTRING::from(PIPE_NAME);

    // SAFETY: WaitNamedPipeW checks whether a pipe instance is available.
    unsafe { WaitNamedPipeW(&pipe_name, 1).as_bool() }
}

/// Duplicates a HANDLE and wraps it as a `std::fs::File`.
///
/// Duplicating lets the original handle and the File be closed
/// independently, avoiding double-close bugs.
fn duplicate_handle_as_file(handle: HANDLE) -> WindowResult<std::fs::File> {
    let mut dup = HANDLE::default();

    // SAFETY: DuplicateHandle creates a copy of the handle. The
    // duplicate is owned by the returned File and closed on drop.
    unsafe {
        DuplicateHandle(
            GetCurrentProcess(),
            handle,
            GetCurrentProcess(),
            &mut dup,
            0,
            false,
            DUPLICATE_SAME_ACCESS,
        )?;

        Ok(std::fs::File::from_raw_handle(dup.0))
    }
}
