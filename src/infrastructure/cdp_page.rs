//! 基于 CDP 的宿主页面实现 - 基础设施层
//!
//! 每个操作都是一段注入页面的脚本。元素通过 `data-jh-handle` 属性标记，
//! Rust 侧只持有这个令牌。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::dom::{
    CardFields, DomAction, ElementHandle, ElementInfo, HostPage, RawCard, RawControl,
    ScrollMetrics,
};
use crate::error::AppResult;
use crate::infrastructure::JsExecutor;

/// 所有脚本共用的辅助函数
const PRELUDE: &str = r#"
    window.__jhSeq = window.__jhSeq || 0;
    const handleOf = (el) => {
        if (!el.dataset.jhHandle) el.dataset.jhHandle = 'jh' + (++window.__jhSeq);
        return el.dataset.jhHandle;
    };
    const byHandle = (h) => document.querySelector(`[data-jh-handle="${h}"]`);
    const visible = (el) => {
        if (!el) return false;
        const s = window.getComputedStyle(el);
        return el.offsetParent !== null && !el.hidden && s.display !== 'none' && s.visibility !== 'hidden';
    };
    const text = (el) => ((el && el.textContent) || '').replace(/\s+/g, ' ').trim();
    const info = (el) => ({
        handle: handleOf(el),
        tag: el.tagName.toLowerCase(),
        text: text(el),
        ariaLabel: el.getAttribute('aria-label'),
        visible: visible(el),
        disabled: !!el.disabled,
    });
"#;

const QUERY_ALL: &str = r#"
    let nodes = [];
    try { nodes = Array.from(document.querySelectorAll(args.selector)); } catch (e) { return []; }
    return nodes.map(info);
"#;

const FORM_CONTROLS: &str = r#"
    const scope = document.querySelector('div.jobs-easy-apply-modal, div[role="dialog"].artdeco-modal') || document;
    const containerSel = '.form-group, .question-group, .question, [class*="question"], .jobs-easy-apply-form-element, .fb-dash-form-element';
    return Array.from(scope.querySelectorAll('input, select, textarea'))
        .filter((el) => (el.type || '').toLowerCase() !== 'hidden')
        .map((el) => {
            const tag = el.tagName.toLowerCase();
            const id = el.id || '';
            let labelFor = null;
            if (id) {
                try {
                    const l = document.querySelector(`label[for="${CSS.escape(id)}"]`);
                    if (l) labelFor = text(l);
                } catch (e) {}
            }
            const enclosing = el.closest('label');
            let containerLabel = null;
            const container = el.closest(containerSel);
            if (container) {
                const l = container.querySelector('label, .label, .question-text, legend');
                if (l && !l.contains(el)) containerLabel = text(l);
            }
            const fieldset = el.closest('fieldset');
            const legend = fieldset ? fieldset.querySelector('legend') : null;
            const prev = el.previousElementSibling;
            let optionLabel = el.nextSibling ? ((el.nextSibling.textContent || '').trim() || null) : null;
            if (!optionLabel && el.nextElementSibling) optionLabel = text(el.nextElementSibling) || null;
            return {
                handle: handleOf(el),
                tag,
                inputType: tag === 'input' ? (el.type || 'text').toLowerCase() : '',
                name: el.name || '',
                id,
                placeholder: el.getAttribute('placeholder'),
                ariaLabel: el.getAttribute('aria-label'),
                value: el.value || '',
                required: !!el.required || el.getAttribute('aria-required') === 'true',
                visible: visible(el),
                disabled: !!el.disabled,
                checked: !!el.checked,
                invalid: el.getAttribute('aria-invalid') === 'true',
                inputmode: el.getAttribute('inputmode'),
                labelFor,
                enclosingLabel: enclosing ? text(enclosing) : null,
                containerLabel,
                fieldsetLegend: legend ? text(legend) : null,
                precedingText: prev ? text(prev) : null,
                optionLabel,
                options: tag === 'select'
                    ? Array.from(el.options).map((o, i) => ({ index: i, text: (o.text || '').trim(), value: o.value || '' }))
                    : [],
                selectedIndex: tag === 'select' && el.selectedIndex >= 0 ? el.selectedIndex : null,
            };
        });
"#;

const JOB_CARDS: &str = r#"
    const container = byHandle(args.container);
    if (!container) return [];
    let cards = [];
    try { cards = Array.from(container.querySelectorAll(args.cardSelector)); } catch (e) { return []; }
    const pick = (root, sel) => {
        if (!sel) return null;
        try { const n = root.querySelector(sel); return n ? (text(n) || null) : null; } catch (e) { return null; }
    };
    return cards.map((card) => {
        let click = null;
        if (args.fields.clickTarget) {
            try { click = card.querySelector(args.fields.clickTarget); } catch (e) {}
        }
        const idEl = card.matches('[data-job-id]') ? card : card.querySelector('[data-job-id]');
        return {
            handle: handleOf(card),
            clickHandle: click ? handleOf(click) : null,
            jobIdAttr: idEl ? idEl.getAttribute('data-job-id') : null,
            occludableIdAttr: card.getAttribute('data-occludable-job-id'),
            title: pick(card, args.fields.title),
            company: pick(card, args.fields.company),
            location: pick(card, args.fields.location),
            text: card.textContent || '',
        };
    });
"#;

const SCROLL_METRICS: &str = r#"
    const el = byHandle(args.handle);
    if (!el) return { scrollHeight: 0, clientHeight: 0 };
    return { scrollHeight: el.scrollHeight, clientHeight: el.clientHeight };
"#;

/// 赋值使用原生 setter，前端框架才能感知到变化
const PERFORM: &str = r#"
    const el = byHandle(args.handle);
    if (!el) return false;
    const setNative = (v) => {
        const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype
            : el instanceof HTMLInputElement ? HTMLInputElement.prototype : null;
        const desc = proto ? Object.getOwnPropertyDescriptor(proto, 'value') : null;
        if (desc && desc.set) desc.set.call(el, v); else el.value = v;
    };
    const a = args.action;
    switch (a.kind) {
        case 'focus': el.focus(); break;
        case 'clear': setNative(''); break;
        case 'setValue': setNative(a.value); break;
        case 'setChecked': el.checked = a.value; break;
        case 'selectIndex': el.selectedIndex = a.value; break;
        case 'dispatch':
            if (a.value === 'click') {
                el.dispatchEvent(new MouseEvent('click', { bubbles: true, cancelable: true }));
            } else {
                el.dispatchEvent(new Event(a.value, { bubbles: true }));
            }
            break;
        case 'click': el.click(); break;
        case 'scrollIntoView': el.scrollIntoView({ behavior: 'smooth', block: 'center' }); break;
        case 'scrollToBottom': el.scrollTop = el.scrollHeight; break;
        default: return false;
    }
    return true;
"#;

/// CDP 宿主页面
pub struct CdpHostPage {
    executor: Arc<JsExecutor>,
}

impl CdpHostPage {
    pub fn new(executor: Arc<JsExecutor>) -> Self {
        Self { executor }
    }

    /// 包装成立即执行函数，`args` 以 JSON 字面量注入
    fn script(body: &str, args: JsonValue) -> String {
        format!(
            "(() => {{ {} const args = {}; {} }})()",
            PRELUDE, args, body
        )
    }
}

fn action_json(action: &DomAction) -> JsonValue {
    match action {
        DomAction::Focus => json!({ "kind": "focus" }),
        DomAction::Clear => json!({ "kind": "clear" }),
        DomAction::SetValue(value) => json!({ "kind": "setValue", "value": value }),
        DomAction::SetChecked(checked) => json!({ "kind": "setChecked", "value": checked }),
        DomAction::SelectIndex(index) => json!({ "kind": "selectIndex", "value": index }),
        DomAction::Dispatch(event) => json!({ "kind": "dispatch", "value": event.name() }),
        DomAction::Click => json!({ "kind": "click" }),
        DomAction::ScrollIntoView => json!({ "kind": "scrollIntoView" }),
        DomAction::ScrollToBottom => json!({ "kind": "scrollToBottom" }),
    }
}

#[async_trait]
impl HostPage for CdpHostPage {
    async fn current_url(&self) -> AppResult<String> {
        self.executor.eval_as("window.location.href").await
    }

    async fn query_all(&self, selector: &str) -> AppResult<Vec<ElementInfo>> {
        self.executor
            .eval_as(Self::script(QUERY_ALL, json!({ "selector": selector })))
            .await
    }

    async fn form_controls(&self) -> AppResult<Vec<RawControl>> {
        self.executor
            .eval_as(Self::script(FORM_CONTROLS, json!({})))
            .await
    }

    async fn job_cards(
        &self,
        container: &ElementHandle,
        card_selector: &str,
        fields: &CardFields,
    ) -> AppResult<Vec<RawCard>> {
        let args = json!({
            "container": container,
            "cardSelector": card_selector,
            "fields": fields,
        });
        self.executor.eval_as(Self::script(JOB_CARDS, args)).await
    }

    async fn scroll_metrics(&self, handle: &ElementHandle) -> AppResult<ScrollMetrics> {
        self.executor
            .eval_as(Self::script(SCROLL_METRICS, json!({ "handle": handle })))
            .await
    }

    async fn perform(&self, handle: &ElementHandle, action: DomAction) -> AppResult<()> {
        let args = json!({ "handle": handle, "action": action_json(&action) });
        let applied: bool = self.executor.eval_as(Self::script(PERFORM, args)).await?;
        if !applied {
            debug!("元素 {} 已不存在，忽略操作 {:?}", handle, action);
        }
        Ok(())
    }
}
