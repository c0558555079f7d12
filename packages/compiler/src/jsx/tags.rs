//! Tag Classification
//!
//! Decides whether a tag names a native element or a component.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use super::ast::TagRef;

const HTML_TAGS: &str = "html,body,base,head,link,meta,style,title,address,article,aside,footer,\
header,hgroup,h1,h2,h3,h4,h5,h6,nav,section,div,dd,dl,dt,figcaption,figure,picture,hr,img,li,\
main,ol,p,pre,ul,a,b,abbr,bdi,bdo,br,cite,code,data,dfn,em,i,kbd,mark,q,rp,rt,ruby,s,samp,\
small,span,strong,sub,sup,time,u,var,wbr,area,audio,map,track,video,embed,object,param,source,\
canvas,script,noscript,del,ins,caption,col,colgroup,table,thead,tbody,td,th,tr,button,datalist,\
fieldset,form,input,label,legend,meter,optgroup,option,output,progress,select,textarea,details,\
dialog,menu,summary,template,blockquote,iframe,tfoot,search";

const SVG_TAGS: &str = "svg,animate,animateMotion,animateTransform,circle,clipPath,\
color-profile,defs,desc,discard,ellipse,feBlend,feColorMatrix,feComponentTransfer,\
feComposite,feConvolveMatrix,feDiffuseLighting,feDisplacementMap,feDistantLight,\
feDropShadow,feFlood,feFuncA,feFuncB,feFuncG,feFuncR,feGaussianBlur,feImage,feMerge,\
feMergeNode,feMorphology,feOffset,fePointLight,feSpecularLighting,feSpotLight,feTile,\
feTurbulence,filter,foreignObject,g,hatch,hatchpath,image,line,linearGradient,marker,mask,\
mesh,meshgradient,meshpatch,meshrow,metadata,mpath,path,pattern,polygon,polyline,\
radialGradient,rect,set,solidcolor,stop,switch,symbol,text,textPath,title,tspan,unknown,use,\
view";

pub const FRAGMENT: &str = "Fragment";
pub const KEEP_ALIVE: &str = "KeepAlive";

lazy_static! {
    static ref HTML_TAG_SET: HashSet<&'static str> = HTML_TAGS.split(',').collect();
    static ref SVG_TAG_SET: HashSet<&'static str> = SVG_TAGS.split(',').collect();
    static ref FRAGMENT_RE: Regex = Regex::new(r"^_?Fragment\d*$").unwrap();
}

pub fn is_html_tag(name: &str) -> bool {
    HTML_TAG_SET.contains(name)
}

pub fn is_svg_tag(name: &str) -> bool {
    SVG_TAG_SET.contains(name)
}

pub fn is_native_tag(name: &str) -> bool {
    is_html_tag(name) || is_svg_tag(name)
}

/// Fragments and `KeepAlive` take their children as a plain array, never as slots.
pub fn should_transform_to_slots(name: &str) -> bool {
    !(FRAGMENT_RE.is_match(name) || name == KEEP_ALIVE)
}

pub fn is_custom_element(name: &str, matchers: &[Regex]) -> bool {
    matchers.iter().any(|re| re.is_match(name))
}

/// Identifier tags are components unless they are native, custom elements, fragments or
/// `KeepAlive`. Member tags are components unless their last segment names a fragment or
/// `KeepAlive`.
pub fn is_component(tag: &TagRef, custom_elements: &[Regex]) -> bool {
    match tag {
        TagRef::Member { object, path } => should_transform_to_slots(path.last().unwrap_or(object)),
        TagRef::Identifier(name) => {
            !is_custom_element(name, custom_elements)
                && should_transform_to_slots(name)
                && !is_native_tag(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> TagRef {
        TagRef::Identifier(name.to_string())
    }

    #[test]
    fn native_tags_are_not_components() {
        assert!(!is_component(&ident("div"), &[]));
        assert!(!is_component(&ident("circle"), &[]));
        assert!(!is_component(&ident("foreignObject"), &[]));
    }

    #[test]
    fn fragments_and_keep_alive_are_not_components() {
        assert!(!is_component(&ident("Fragment"), &[]));
        assert!(!is_component(&ident("_Fragment2"), &[]));
        assert!(!is_component(&ident("KeepAlive"), &[]));
        assert!(is_component(&ident("MyFragmentList"), &[]));
    }

    #[test]
    fn custom_elements_are_not_components() {
        let matchers = vec![Regex::new("^x-").unwrap()];
        assert!(!is_component(&ident("x-button"), &matchers));
        assert!(is_component(&ident("XButton"), &matchers));
    }

    #[test]
    fn member_tags_are_components() {
        let tag = TagRef::Member {
            object: "Foo".to_string(),
            path: vec!["div".to_string()],
        };
        assert!(is_component(&tag, &[]));
    }

    #[test]
    fn member_fragments_and_keep_alive_take_plain_children() {
        let member = |object: &str, last: &str| TagRef::Member {
            object: object.to_string(),
            path: vec![last.to_string()],
        };
        assert!(!is_component(&member("Vue", "KeepAlive"), &[]));
        assert!(!is_component(&member("Foo", "Fragment"), &[]));
        assert!(is_component(&member("Foo", "Bar"), &[]));
    }
}
