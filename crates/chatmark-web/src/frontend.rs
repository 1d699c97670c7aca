//! Embedded single-page HTML frontend.
//!
//! The whole chat UI is one HTML constant with inline CSS and JavaScript.
//! Assistant turns arrive as sanitized HTML from the server and are inserted
//! as-is; user turns arrive already escaped.

/// The complete HTML frontend as a static string.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>chatmark</title>
<style>
*,*::before,*::after{box-sizing:border-box;margin:0;padding:0}
:root{
  --bg:#1a1a2e;
  --bg-secondary:#16213e;
  --bg-input:#0f3460;
  --bg-user:#533483;
  --bg-assistant:#16213e;
  --text:#e4e4e4;
  --text-muted:#8a8a9a;
  --accent:#e94560;
  --accent-hover:#ff6b81;
  --border:#2a2a4a;
  --code-bg:#0d1117;
  --success:#4ecca3;
  --warning:#f0a500;
}
html,body{height:100%;font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,Helvetica,Arial,sans-serif;background:var(--bg);color:var(--text)}
body{display:flex;flex-direction:column}

/* Header */
.header{
  display:flex;align-items:center;justify-content:space-between;
  padding:12px 20px;background:var(--bg-secondary);border-bottom:1px solid var(--border);
  flex-shrink:0;
}
.header h1{font-size:18px;font-weight:600;letter-spacing:.5px}
.header h1 span{color:var(--accent)}
.status{display:flex;align-items:center;gap:6px;font-size:13px;color:var(--text-muted)}
.status-dot{width:8px;height:8px;border-radius:50%;background:var(--success);transition:background .3s}
.status-dot.loading{background:var(--warning);animation:pulse 1s infinite}
@keyframes pulse{0%,100%{opacity:1}50%{opacity:.4}}

/* Messages area */
.messages{
  flex:1;overflow-y:auto;padding:16px 20px;
  display:flex;flex-direction:column;gap:12px;
}
.message{
  max-width:780px;padding:14px 18px;border-radius:12px;
  line-height:1.6;font-size:15px;
  word-wrap:break-word;overflow-wrap:break-word;
}
.message.user{
  background:var(--bg-user);align-self:flex-end;border-bottom-right-radius:4px;
}
.message.assistant{
  background:var(--bg-assistant);align-self:flex-start;
  border:1px solid var(--border);border-bottom-left-radius:4px;
}
.message.assistant p{margin-bottom:8px}
.message.assistant p:last-child{margin-bottom:0}
.message.assistant table{border-collapse:collapse;margin:8px 0}
.message.assistant th,.message.assistant td{border:1px solid var(--border);padding:4px 8px}

/* Math */
.math-display{display:block;text-align:center;margin:8px 0;overflow-x:auto}
.math-error{border-bottom:1px dashed var(--accent)}

/* Code blocks */
code{
  font-family:"SF Mono",Monaco,Consolas,monospace;
  background:var(--code-bg);padding:2px 6px;border-radius:4px;font-size:13px;
}
pre{
  background:var(--code-bg);padding:14px;border-radius:8px;
  overflow-x:auto;margin:8px 0;border:1px solid var(--border);
}
pre code{display:block;background:none;padding:0;font-size:13px;line-height:1.5;white-space:pre}
pre hr{border:none;border-top:1px solid var(--border);margin:6px 0 10px}
.copycode-lang{font-size:12px;color:var(--text-muted)}
.copycode-btn{font-size:12px;color:var(--text-muted);cursor:pointer;user-select:none}
.copycode-btn:hover{color:var(--accent-hover)}
.copycode-btn.copied{color:var(--success)}

/* Input area */
.input-area{
  flex-shrink:0;padding:16px 20px;
  background:var(--bg-secondary);border-top:1px solid var(--border);
}
.input-wrapper{
  max-width:780px;margin:0 auto;display:flex;gap:10px;align-items:flex-end;
}
.input-wrapper textarea{
  flex:1;resize:none;padding:12px 16px;border-radius:12px;
  background:var(--bg-input);border:1px solid var(--border);
  color:var(--text);font-size:15px;font-family:inherit;
  line-height:1.5;outline:none;transition:border-color .2s;
}
.input-wrapper textarea:focus{border-color:var(--accent)}
.input-wrapper textarea::placeholder{color:var(--text-muted)}
.btn{
  height:48px;padding:0 16px;border-radius:12px;border:none;
  background:var(--accent);color:#fff;cursor:pointer;font-size:14px;
  transition:background .2s;flex-shrink:0;
}
.btn.secondary{background:var(--bg-input);border:1px solid var(--border)}
.btn:hover:not(:disabled){background:var(--accent-hover)}
.btn:disabled{opacity:.4;cursor:not-allowed}

/* Scrollbar */
.messages::-webkit-scrollbar{width:6px}
.messages::-webkit-scrollbar-track{background:transparent}
.messages::-webkit-scrollbar-thumb{background:var(--border);border-radius:3px}

@media(max-width:600px){
  .messages{padding:12px 10px}
  .input-area{padding:12px 10px}
  .message{padding:12px 14px;font-size:14px}
}
</style>
</head>
<body>

<div class="header">
  <h1><span>chat</span>mark</h1>
  <div class="status">
    <div class="status-dot" id="statusDot"></div>
    <span id="statusText">Ready</span>
  </div>
</div>

<div class="messages" id="messages"></div>

<div class="input-area">
  <div class="input-wrapper">
    <textarea id="input" placeholder="Type your message..." rows="2"></textarea>
    <button class="btn secondary" id="newBtn">New chat</button>
    <button class="btn" id="sendBtn">Submit</button>
  </div>
</div>

<script>
(function() {
  "use strict";

  const messagesEl = document.getElementById("messages");
  const inputEl    = document.getElementById("input");
  const sendBtn    = document.getElementById("sendBtn");
  const newBtn     = document.getElementById("newBtn");
  const statusDot  = document.getElementById("statusDot");
  const statusText = document.getElementById("statusText");

  let loading = false;

  // -------------------------------------------------------------------
  // Rendering
  // -------------------------------------------------------------------

  function renderTurns(turns) {
    messagesEl.innerHTML = "";
    turns.forEach(function(turn) { addMessage(turn.speaker, turn.content); });
  }

  function addMessage(speaker, html) {
    const el = document.createElement("div");
    el.className = "message " + speaker;
    el.innerHTML = html;
    messagesEl.appendChild(el);
    scrollToBottom();
    return el;
  }

  function scrollToBottom() {
    requestAnimationFrame(function() {
      messagesEl.scrollTop = messagesEl.scrollHeight;
    });
  }

  function escapeHtml(str) {
    const div = document.createElement("div");
    div.appendChild(document.createTextNode(str));
    return div.innerHTML.replace(/\r?\n/g, "<br>");
  }

  function setLoading(value) {
    loading = value;
    sendBtn.disabled = value;
    statusDot.className = "status-dot" + (value ? " loading" : "");
    statusText.textContent = value ? "Thinking..." : "Ready";
  }

  // -------------------------------------------------------------------
  // API
  // -------------------------------------------------------------------

  function refresh() {
    return fetch("/api/messages")
      .then(function(r) { return r.json(); })
      .then(renderTurns)
      .catch(function(e) { console.error("Failed to load messages:", e); });
  }

  function submit() {
    const text = inputEl.value;
    if (!text.trim() || loading) return;

    addMessage("user", escapeHtml(text));
    inputEl.value = "";
    autoResize();
    setLoading(true);

    fetch("/api/chat", {
      method: "POST",
      headers: {"Content-Type": "application/json"},
      body: JSON.stringify({message: text})
    })
      .catch(function(e) { console.error("Chat request failed:", e); })
      .then(refresh)
      .then(function() { setLoading(false); });
  }

  function newChat() {
    fetch("/api/new", {method: "POST"})
      .then(refresh)
      .catch(function(e) { console.error("New chat failed:", e); });
  }

  function copy(btn) {
    const id = btn.getAttribute("data-copy-id");
    if (!id) return;

    fetch("/api/copy/" + encodeURIComponent(id), {method: "POST"})
      .then(function(r) { return r.json(); })
      .then(function(body) {
        if (body.text === undefined) return false;
        if (!navigator.clipboard) return body.copied;
        return navigator.clipboard.writeText(body.text)
          .then(function() { return true; })
          .catch(function() { return body.copied; });
      })
      .then(function(copied) {
        if (!copied) return;
        btn.classList.add("copied");
        btn.textContent = "Copied";
        setTimeout(function() {
          btn.classList.remove("copied");
          btn.textContent = "Copy";
        }, 1500);
      })
      .catch(function(e) { console.error("Copy failed:", e); });
  }

  // -------------------------------------------------------------------
  // Textarea: 2 to 5 rows
  // -------------------------------------------------------------------

  function autoResize() {
    const lines = inputEl.value.split("\n").length;
    inputEl.rows = Math.min(Math.max(lines, 2), 5);
  }

  // -------------------------------------------------------------------
  // Event listeners
  // -------------------------------------------------------------------

  sendBtn.addEventListener("click", submit);
  newBtn.addEventListener("click", newChat);

  inputEl.addEventListener("keydown", function(e) {
    if (e.key === "Enter" && !e.shiftKey) {
      e.preventDefault();
      submit();
    }
  });

  inputEl.addEventListener("input", autoResize);

  messagesEl.addEventListener("click", function(e) {
    const btn = e.target.closest(".copycode-btn");
    if (btn) copy(btn);
  });

  // -------------------------------------------------------------------
  // Init
  // -------------------------------------------------------------------

  refresh();
})();
</script>
</body>
</html>
"##;
