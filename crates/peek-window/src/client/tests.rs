//! Client runtime tests: the bundled script runs inside `boa_engine` against
//! a small fake browser (DOM body, sessionStorage, WebSocket, location).

use boa_engine::{Context, Source};
use peek_render::{MarkdownRenderer, Renderer, LINE_ATTR};
use serde_json::{json, Value};

use super::*;

/// Globals the script touches. `sessionStorage` and the reload counter
/// survive `newPage`, everything else is per page load.
const FAKE_BROWSER: &str = r##"
var storage = new Map();
var reloads = 0;
var page = null;

globalThis.window = globalThis;
globalThis.sessionStorage = {
  getItem(key) { return storage.has(key) ? storage.get(key) : null; },
  setItem(key, value) { storage.set(key, String(value)); },
  removeItem(key) { storage.delete(key); },
};
globalThis.location = { reload() { reloads += 1; } };
globalThis.console = {};
for (const level of ['log', 'info', 'debug', 'warn', 'error']) {
  console[level] = (...args) => page.logs.push([level, ...args.map(String)]);
}
globalThis.addEventListener = (type, handler) => { page.listeners[type] = handler; };

globalThis.Blob = class Blob {};
globalThis.TextDecoder = class TextDecoder {
  decode(buffer) { return String.fromCharCode(...new Uint8Array(buffer)); }
};
globalThis.WebSocket = class WebSocket {
  constructor(url) {
    this.url = url;
    this.handlers = {};
    page.sockets.push(this);
  }
  addEventListener(type, handler) { this.handlers[type] = handler; }
  fire(type, event) { this.handlers[type](event); }
};

function marker(attr, line, index) {
  return {
    getAttribute(name) { return name === attr ? String(line) : null; },
    scrollIntoView(options) {
      page.scrolls.push({ line, index, block: options.block, behavior: options.behavior });
    },
  };
}

function newPage(attr) {
  const body = {
    markup: '',
    markers: [],
    classList: { names: [], add(name) { this.names.push(name); } },
    get innerHTML() { return this.markup; },
    set innerHTML(html) {
      this.markup = html;
      this.markers = [];
      const re = new RegExp(attr + '="(\\d+)"', 'g');
      let m;
      while ((m = re.exec(html)) !== null) {
        this.markers.push(marker(attr, Number(m[1]), this.markers.length));
      }
    },
    querySelectorAll(selector) {
      return selector === '[' + attr + ']' ? this.markers : [];
    },
  };
  page = { body, sockets: [], scrolls: [], listeners: {}, logs: [] };
  globalThis.document = {
    documentElement: { dataset: {} },
    getElementById(id) { return id === 'markdown-body' ? body : null; },
  };
}

function socket() { return page.sockets[page.sockets.length - 1]; }

function deliver(msg) { socket().fire('message', { data: JSON.stringify(msg) }); }

function deliverBinary(msg) {
  const text = JSON.stringify(msg);
  const bytes = new Uint8Array(text.length);
  for (let i = 0; i < text.length; i++) bytes[i] = text.charCodeAt(i);
  socket().fire('message', { data: bytes.buffer });
}
"##;

struct Browser {
    ctx: Context,
}

impl Browser {
    fn new() -> Self {
        let mut browser = Self {
            ctx: Context::default(),
        };
        browser.run(FAKE_BROWSER);
        browser
    }

    /// A fresh page load with the given theme. Session storage carries over.
    fn load(&mut self, theme: Theme) {
        let config = ClientConfig {
            theme,
            server_url: "localhost:4000".into(),
            debug: false,
        };
        self.run(&format!("newPage('{LINE_ATTR}');"));
        self.run(&config.init_script());
        self.run(SCRIPT);
    }

    fn run(&mut self, src: &str) {
        if let Err(e) = self.ctx.eval(Source::from_bytes(src)) {
            panic!("script failed: {e}");
        }
        // Message handling goes through a promise chain.
        self.ctx.run_jobs();
    }

    fn json(&mut self, expr: &str) -> Value {
        let value = match self.ctx.eval(Source::from_bytes(&format!("JSON.stringify({expr})"))) {
            Ok(value) => value,
            Err(e) => panic!("evaluating {expr} failed: {e}"),
        };
        let text = value.to_string(&mut self.ctx).unwrap().to_std_string_escaped();
        serde_json::from_str(&text).unwrap()
    }

    fn deliver(&mut self, event: Value) {
        self.run(&format!("deliver({event});"));
    }

    fn scrolls(&mut self) -> Value {
        self.json("page.scrolls")
    }
}

fn marked(lines: &[u32]) -> String {
    lines
        .iter()
        .map(|line| format!("<p {LINE_ATTR}=\"{line}\">line {line}</p>"))
        .collect()
}

fn show(html: &str) -> Value {
    json!({"action": "show", "html": html, "lcount": 12})
}

fn scroll(line: u64) -> Value {
    json!({"action": "scroll", "line": line})
}

fn scrolled(line: u64, index: u64) -> Value {
    json!({"line": line, "index": index, "block": "center", "behavior": "smooth"})
}

// ---------------------------------------------------------------------
// Startup config
// ---------------------------------------------------------------------

#[test]
fn init_script_carries_config() {
    let config = ClientConfig {
        theme: Theme::Light,
        server_url: "localhost:4321".into(),
        debug: true,
    };
    assert_eq!(
        config.init_script(),
        r#"window.peek = Object.freeze({"theme":"light","serverUrl":"localhost:4321","debug":true});"#
    );
}

#[test]
fn init_script_escapes_strings() {
    let config = ClientConfig {
        theme: Theme::Dark,
        server_url: "\"</script>".into(),
        debug: false,
    };
    assert!(config.init_script().contains(r#""serverUrl":"\"</script>""#));
}

#[test]
fn connects_to_configured_server() {
    let mut browser = Browser::new();
    browser.load(Theme::Dark);
    assert_eq!(browser.json("socket().url"), "ws://localhost:4000/");
    assert_eq!(browser.json("page.sockets.length"), 1);
}

#[test]
fn theme_is_applied_to_body() {
    let mut browser = Browser::new();
    browser.load(Theme::Light);
    assert_eq!(browser.json("page.body.classList.names"), json!(["light"]));
    assert_eq!(browser.json("document.documentElement.dataset.theme"), "light");
}

// ---------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------

#[test]
fn show_replaces_body() {
    let mut browser = Browser::new();
    browser.load(Theme::Dark);
    browser.deliver(show("<p>first</p>"));
    browser.deliver(show("<p>second</p>"));
    assert_eq!(browser.json("page.body.innerHTML"), "<p>second</p>");
}

#[test]
fn scroll_prefers_earlier_of_equal_markers() {
    let mut browser = Browser::new();
    browser.load(Theme::Dark);
    browser.deliver(show(&marked(&[1, 5, 5, 10])));
    browser.deliver(scroll(7));
    assert_eq!(browser.scrolls(), json!([scrolled(5, 1)]));
}

#[test]
fn scroll_before_first_marker_does_nothing() {
    let mut browser = Browser::new();
    browser.load(Theme::Dark);
    browser.deliver(show(&marked(&[1, 5, 5, 10])));
    browser.deliver(scroll(0));
    assert_eq!(browser.scrolls(), json!([]));
}

#[test]
fn scroll_past_last_marker_picks_last() {
    let mut browser = Browser::new();
    browser.load(Theme::Dark);
    browser.deliver(show(&marked(&[1, 5, 5, 10])));
    browser.deliver(scroll(10));
    browser.deliver(scroll(400));
    assert_eq!(browser.scrolls(), json!([scrolled(10, 3), scrolled(10, 3)]));
}

#[test]
fn scroll_follows_rendered_markdown() {
    let rendered = MarkdownRenderer::default()
        .render("# Title\n\ntext\n\n## Second\n\nmore\n")
        .unwrap();
    let mut browser = Browser::new();
    browser.load(Theme::Dark);
    browser.deliver(show(&rendered.html));
    browser.deliver(scroll(6));
    // Heading on line 5 is the third marked block.
    assert_eq!(browser.scrolls(), json!([scrolled(5, 2)]));
}

#[test]
fn binary_frames_keep_arrival_order() {
    let mut browser = Browser::new();
    browser.load(Theme::Dark);
    let html = marked(&[1, 3]);
    browser.run(&format!("deliverBinary({});", show(&html)));
    browser.deliver(scroll(3));
    assert_eq!(browser.json("page.body.innerHTML"), Value::String(html));
    assert_eq!(browser.scrolls(), json!([scrolled(3, 1)]));
}

#[test]
fn unknown_action_is_logged_and_ignored() {
    let mut browser = Browser::new();
    browser.load(Theme::Dark);
    browser.deliver(show(&marked(&[2])));
    browser.deliver(json!({"action": "open", "path": "/tmp"}));
    browser.deliver(scroll(2));

    assert_eq!(browser.scrolls(), json!([scrolled(2, 0)]));
    let warnings = browser.json("page.logs.filter((entry) => entry[0] === 'warn')");
    assert_eq!(warnings, json!([["warn", "peek: unknown action", "open"]]));
}

// ---------------------------------------------------------------------
// Snapshot and reload
// ---------------------------------------------------------------------

#[test]
fn snapshot_replays_markup_and_scrolls_once() {
    let mut browser = Browser::new();
    browser.load(Theme::Dark);
    let html = marked(&[1, 5, 5, 10]);
    browser.deliver(show(&html));
    browser.deliver(scroll(5));
    browser.run("page.listeners.beforeunload();");

    browser.load(Theme::Dark);
    assert_eq!(browser.json("page.body.innerHTML"), Value::String(html));
    assert_eq!(browser.scrolls(), json!([scrolled(5, 1)]));
}

#[test]
fn first_load_has_nothing_to_replay() {
    let mut browser = Browser::new();
    browser.load(Theme::Dark);
    assert_eq!(browser.json("page.body.innerHTML"), "");
    assert_eq!(browser.scrolls(), json!([]));
}

#[test]
fn unclean_close_reloads_only_once() {
    let mut browser = Browser::new();
    browser.load(Theme::Dark);
    browser.run("socket().fire('open', {});");
    browser.run("socket().fire('close', { wasClean: false, code: 1006 });");
    assert_eq!(browser.json("reloads"), 1);
    assert_eq!(browser.json("sessionStorage.getItem('reloaded')"), "1");

    // The reloaded page cannot reach the server either.
    browser.load(Theme::Dark);
    browser.run("socket().fire('close', { wasClean: false, code: 1006 });");
    assert_eq!(browser.json("reloads"), 1);
}

#[test]
fn reconnect_rearms_reload() {
    let mut browser = Browser::new();
    browser.load(Theme::Dark);
    browser.run("socket().fire('close', { wasClean: false, code: 1006 });");
    assert_eq!(browser.json("reloads"), 1);

    browser.load(Theme::Dark);
    browser.run("socket().fire('open', {});");
    assert_eq!(browser.json("sessionStorage.getItem('reloaded')"), Value::Null);
    browser.run("socket().fire('close', { wasClean: false, code: 1006 });");
    assert_eq!(browser.json("reloads"), 2);
}

#[test]
fn clean_close_does_not_reload() {
    let mut browser = Browser::new();
    browser.load(Theme::Dark);
    browser.run("socket().fire('open', {});");
    browser.run("socket().fire('close', { wasClean: true, code: 1000 });");
    assert_eq!(browser.json("reloads"), 0);
}
