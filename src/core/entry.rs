use std::fmt;

/// Transient reachability state of one alias.
///
/// Never persisted; it is recomputed or re-derived from the status cache on
/// every load. Terminal states are `Online` and `Offline`; everything else
/// means a check is pending or in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Waiting,
    Checking,
    Online,
    Offline,
}

impl ConnectionStatus {
    /// Whether this status is a final check outcome
    pub fn is_terminal(self) -> bool {
        matches!(self, ConnectionStatus::Online | ConnectionStatus::Offline)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionStatus::Unknown => "Unknown",
            ConnectionStatus::Waiting => "Waiting...",
            ConnectionStatus::Checking => "Checking...",
            ConnectionStatus::Online => "Online",
            ConnectionStatus::Offline => "Offline",
        };
        write!(f, "{}", label)
    }
}

/// One Oracle connection alias from a tnsnames.ora file.
///
/// Field values are kept as text exactly as found in the source file; the
/// port is deliberately not parsed to an integer so odd-but-working files
/// survive a load/save cycle. Name uniqueness is the caller's concern, the
/// model itself tolerates duplicates.
#[derive(Debug, Clone)]
pub struct TnsEntry {
    pub name: String,
    pub host: String,
    pub port: String,
    pub service_name: String,
    pub sid: String,
    pub protocol: String,
    pub server: String,
    /// Original matched text block for this entry (diagnostic use)
    pub raw_content: String,
    /// Transient, never written to disk
    pub status: ConnectionStatus,
}

impl Default for TnsEntry {
    fn default() -> Self {
        Self {
            name: String::new(),
            host: String::new(),
            port: String::new(),
            service_name: String::new(),
            sid: String::new(),
            protocol: "TCP".to_string(),
            server: String::new(),
            raw_content: String::new(),
            status: ConnectionStatus::Unknown,
        }
    }
}

impl TnsEntry {
    /// Render this entry as a canonical nested-parenthesis tnsnames block.
    ///
    /// Shape rules:
    /// - with a SERVER value the ADDRESS line sits directly under
    ///   DESCRIPTION (no ADDRESS_LIST wrapper)
    /// - without SERVER the single ADDRESS line is wrapped in ADDRESS_LIST
    /// - CONNECT_DATA lists SERVER, SERVICE_NAME, SID in that order,
    ///   omitting empty values
    ///
    /// Output is deterministic for equal field values.
    pub fn to_tns_format(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("{} =\n", self.name));
        out.push_str("  (DESCRIPTION =\n");

        let address = format!(
            "(ADDRESS = (PROTOCOL = {})(HOST = {})(PORT = {}))",
            self.protocol, self.host, self.port
        );

        if !self.server.is_empty() {
            out.push_str(&format!("    {}\n", address));
        } else {
            out.push_str("    (ADDRESS_LIST =\n");
            out.push_str(&format!("      {}\n", address));
            out.push_str("    )\n");
        }

        out.push_str("    (CONNECT_DATA =\n");

        if !self.server.is_empty() {
            out.push_str(&format!("      (SERVER = {})\n", self.server));
        }

        if !self.service_name.is_empty() {
            out.push_str(&format!("      (SERVICE_NAME = {})\n", self.service_name));
        }

        if !self.sid.is_empty() {
            out.push_str(&format!("      (SID = {})\n", self.sid));
        }

        out.push_str("    )\n");
        out.push_str("  )\n");

        out
    }

    /// Case-insensitive equality over the seven identity fields.
    ///
    /// `status` and `raw_content` never participate in identity.
    pub fn is_identical_to(&self, other: &TnsEntry) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.host.eq_ignore_ascii_case(&other.host)
            && self.port.eq_ignore_ascii_case(&other.port)
            && self.service_name.eq_ignore_ascii_case(&other.service_name)
            && self.sid.eq_ignore_ascii_case(&other.sid)
            && self.protocol.eq_ignore_ascii_case(&other.protocol)
            && self.server.eq_ignore_ascii_case(&other.server)
    }

    /// Short one-line summary used in listings and log lines
    pub fn summary(&self) -> String {
        format!("{} - {}:{}", self.name, self.host, self.port)
    }
}
